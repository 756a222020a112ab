//! Task files written through the repository and read back

use std::collections::BTreeMap;

use chrono::NaiveDate;
use countermax_domain::model::{CountMatrix, TaskRecord};
use countermax_domain::repository::TaskFileRepository;
use countermax_infra::persistence::FileTaskRepository;
use countermax_infra::task_file::{parse_korean_datetime, INFO_KEYS};

fn record() -> TaskRecord {
    let date = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
    let mut record = TaskRecord::new(
        "SN_2025120514252315",
        "WN_25120514252301",
        "hkw3316",
        date,
        date.and_hms_opt(14, 25, 23).unwrap(),
    );
    record.user_name = "홍길동".to_string();
    record
}

#[test]
fn test_zero_matrix_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileTaskRepository::new(dir.path());
    let mut rec = record();
    rec.matrices = vec![CountMatrix::zeros(2, 2)];
    repo.write(&rec).unwrap();

    let doc = repo.read(&rec.survey_no, &rec.doc_no()).unwrap();
    let expected: BTreeMap<(usize, usize), i64> =
        [((0, 0), 0), ((0, 1), 0), ((1, 0), 0), ((1, 1), 0)].into_iter().collect();
    assert_eq!(doc.section(0), Some(&expected));
    assert_eq!(doc.matrices(), rec.matrices);
}

#[test]
fn test_header_survives_cp949() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileTaskRepository::new(dir.path());
    let rec = record();
    let path = repo.write(&rec).unwrap();

    // not UTF-8 on disk
    let bytes = std::fs::read(&path).unwrap();
    assert!(String::from_utf8(bytes).is_err());

    let doc = repo.read(&rec.survey_no, &rec.doc_no()).unwrap();
    let keys: Vec<&str> = doc.info.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, INFO_KEYS.to_vec());
    assert_eq!(doc.info_value("USER_NM"), Some("홍길동"));
    assert_eq!(doc.info_value("DOC_NO"), Some("WN_25120514252301_20251205_hkw3316"));
    assert_eq!(doc.info_value("START_TIME"), Some("2025-12-05 오후 02:25:23"));
    assert_eq!(
        doc.info_value("LAST_TIME").and_then(parse_korean_datetime),
        Some(rec.last_time)
    );
    assert!(doc.sections.is_empty());
}

#[test]
fn test_rewrite_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileTaskRepository::new(dir.path());
    let mut rec = record();
    rec.matrices = vec![CountMatrix::zeros(1, 1), CountMatrix::zeros(1, 1)];
    repo.write(&rec).unwrap();

    rec.matrices = vec![CountMatrix::from_raw(vec![vec!["5"]])];
    rec.deleted = true;
    repo.write(&rec).unwrap();

    let doc = repo.read(&rec.survey_no, &rec.doc_no()).unwrap();
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.section(0).and_then(|s| s.get(&(0, 0))), Some(&5));
    assert_eq!(doc.info_value("DELETED"), Some("1"));
    assert_eq!(repo.list(&rec.survey_no).unwrap().len(), 1);
}
