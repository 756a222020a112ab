//! Task file (.dat) codec
//!
//! ```text
//! [INFO]
//! DOC_NO=<WN>_<YYYYMMDD>_<USER>
//! SURVEY_NO=...
//! ...
//! DELETED=<0|1>
//!
//! [0]
//! <row>,<col>=<count>
//! ```
//!
//! CRLF line endings, EUC-KR (cp949) bytes. Every header key is always
//! written, in the order of [`INFO_KEYS`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{NaiveDateTime, Timelike};
use encoding_rs::EUC_KR;
use tracing::warn;

use countermax_domain::model::{coerce_count, TaskDocument, TaskRecord};
use countermax_types::{Error, Result};

const CRLF: &str = "\r\n";
const INFO_SECTION: &str = "INFO";

pub const INFO_KEYS: [&str; 11] = [
    "DOC_NO",
    "SURVEY_NO",
    "WORK_NO",
    "USER_ID",
    "USER_NM",
    "REC_DATE",
    "SEQ_NO",
    "START_TIME",
    "LAST_TIME",
    "STATE",
    "DELETED",
];

/// `YYYY-MM-DD 오전|오후 hh:mm:ss`, 12-hour clock with 0 shown as 12
pub fn format_korean_datetime(t: NaiveDateTime) -> String {
    let (pm, hour12) = t.hour12();
    let marker = if pm { "오후" } else { "오전" };
    format!(
        "{} {} {:02}:{:02}:{:02}",
        t.format("%Y-%m-%d"),
        marker,
        hour12,
        t.minute(),
        t.second()
    )
}

/// Inverse of [`format_korean_datetime`]
pub fn parse_korean_datetime(raw: &str) -> Option<NaiveDateTime> {
    let mut parts = raw.split_whitespace();
    let date = parts.next()?;
    let marker = parts.next()?;
    let time = parts.next()?;
    let pm = match marker {
        "오전" => false,
        "오후" => true,
        _ => return None,
    };
    let mut hms = time.split(':').map(|p| p.parse::<u32>().ok());
    let (h, m, s) = (hms.next()??, hms.next()??, hms.next()??);
    if !(1..=12).contains(&h) {
        return None;
    }
    let hour = match (pm, h) {
        (false, 12) => 0,
        (false, h) => h,
        (true, 12) => 12,
        (true, h) => h + 12,
    };
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(hour, m, s)
}

/// Render the record as text (CRLF line endings)
pub fn render(record: &TaskRecord) -> String {
    let mut out = String::new();
    let info = [
        record.doc_no(),
        record.survey_no.clone(),
        record.work_no.clone(),
        record.user_id.clone(),
        record.user_name.clone(),
        record.rec_date.format("%Y-%m-%d").to_string(),
        record.seq_no.to_string(),
        format_korean_datetime(record.start_time),
        format_korean_datetime(record.last_time),
        record.state.to_string(),
        u8::from(record.deleted).to_string(),
    ];

    out.push_str("[INFO]");
    out.push_str(CRLF);
    for (key, value) in INFO_KEYS.iter().zip(info.iter()) {
        let _ = write!(out, "{}={}{}", key, value, CRLF);
    }
    out.push_str(CRLF);

    for (index, matrix) in record.matrices.iter().enumerate() {
        let _ = write!(out, "[{}]{}", index, CRLF);
        for (r, c, value) in matrix.cells() {
            let _ = write!(out, "{},{}={}{}", r, c, value, CRLF);
        }
        out.push_str(CRLF);
    }
    out
}

/// Encode to cp949; characters it cannot represent are an error
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = EUC_KR.encode(text);
    if had_errors {
        return Err(Error::TaskFile(
            "text contains characters not representable in cp949".to_string(),
        ));
    }
    Ok(bytes.into_owned())
}

pub fn decode(bytes: &[u8]) -> String {
    let (text, _, had_errors) = EUC_KR.decode(bytes);
    if had_errors {
        warn!("some characters could not be decoded from cp949");
    }
    text.into_owned()
}

/// Parse task file text. Section order and blank lines are not significant.
pub fn parse(text: &str) -> Result<TaskDocument> {
    let mut doc = TaskDocument::default();
    let mut section: Option<String> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r').trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            if name != INFO_SECTION {
                let index: usize = name.parse().map_err(|_| {
                    Error::TaskFile(format!("line {}: unknown section [{}]", line_no + 1, name))
                })?;
                doc.sections.entry(index).or_insert_with(BTreeMap::new);
            }
            section = Some(name.to_string());
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| {
            Error::TaskFile(format!("line {}: expected key=value", line_no + 1))
        })?;
        match section.as_deref() {
            Some(INFO_SECTION) => doc.info.push((key.trim().to_string(), value.to_string())),
            Some(name) => {
                let index: usize = name.parse().map_err(|_| {
                    Error::TaskFile(format!("line {}: unknown section [{}]", line_no + 1, name))
                })?;
                let (r, c) = parse_cell(key).ok_or_else(|| {
                    Error::TaskFile(format!("line {}: bad cell '{}'", line_no + 1, key))
                })?;
                doc.sections
                    .entry(index)
                    .or_default()
                    .insert((r, c), coerce_count(value));
            }
            None => {
                return Err(Error::TaskFile(format!(
                    "line {}: data before any section",
                    line_no + 1
                )))
            }
        }
    }
    Ok(doc)
}

fn parse_cell(key: &str) -> Option<(usize, usize)> {
    let (r, c) = key.split_once(',')?;
    Some((r.trim().parse().ok()?, c.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use countermax_domain::model::CountMatrix;

    fn dt(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record() -> TaskRecord {
        let mut record = TaskRecord::new(
            "SN_2025120514252315",
            "WN_25120514252301",
            "hkw3316",
            NaiveDate::from_ymd_opt(2025, 12, 5).unwrap(),
            dt(0, 5, 9),
        );
        record.user_name = "홍길동".to_string();
        record.last_time = dt(13, 30, 0);
        record
    }

    #[test]
    fn test_korean_datetime_hours() {
        assert_eq!(format_korean_datetime(dt(0, 5, 9)), "2025-12-05 오전 12:05:09");
        assert_eq!(format_korean_datetime(dt(11, 59, 59)), "2025-12-05 오전 11:59:59");
        assert_eq!(format_korean_datetime(dt(12, 0, 0)), "2025-12-05 오후 12:00:00");
        assert_eq!(format_korean_datetime(dt(23, 1, 2)), "2025-12-05 오후 11:01:02");
    }

    #[test]
    fn test_parse_korean_datetime() {
        for t in [dt(0, 5, 9), dt(12, 0, 0), dt(23, 1, 2), dt(7, 0, 0)] {
            assert_eq!(parse_korean_datetime(&format_korean_datetime(t)), Some(t));
        }
        assert_eq!(parse_korean_datetime("2025-12-05 AM 01:00:00"), None);
        assert_eq!(parse_korean_datetime("2025-12-05 오전 13:00:00"), None);
    }

    #[test]
    fn test_render_header_order_and_crlf() {
        let text = render(&record());
        let expected = "[INFO]\r\n\
            DOC_NO=WN_25120514252301_20251205_hkw3316\r\n\
            SURVEY_NO=SN_2025120514252315\r\n\
            WORK_NO=WN_25120514252301\r\n\
            USER_ID=hkw3316\r\n\
            USER_NM=홍길동\r\n\
            REC_DATE=2025-12-05\r\n\
            SEQ_NO=0\r\n\
            START_TIME=2025-12-05 오전 12:05:09\r\n\
            LAST_TIME=2025-12-05 오후 01:30:00\r\n\
            STATE=1\r\n\
            DELETED=0\r\n\
            \r\n";
        assert_eq!(text, expected);
        assert!(!text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_render_sections() {
        let mut r = record();
        r.matrices = vec![CountMatrix::from_raw(vec![vec!["3", "x"]]), CountMatrix::zeros(1, 1)];
        let text = render(&r);
        assert!(text.ends_with("[0]\r\n0,0=3\r\n0,1=0\r\n\r\n[1]\r\n0,0=0\r\n\r\n"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("0,0=1\r\n").is_err());
        assert!(parse("[X]\r\n").is_err());
        assert!(parse("[0]\r\nnot a cell\r\n").is_err());
        assert!(parse("[0]\r\na,b=1\r\n").is_err());
    }

    #[test]
    fn test_parse_coerces_values() {
        let doc = parse("[0]\n0,0=abc\n0,1=7\n").unwrap();
        let cells = doc.section(0).unwrap();
        assert_eq!(cells.get(&(0, 0)), Some(&0));
        assert_eq!(cells.get(&(0, 1)), Some(&7));
    }

    #[test]
    fn test_encode_cp949() {
        let bytes = encode("USER_NM=홍길동").unwrap();
        assert_eq!(decode(&bytes), "USER_NM=홍길동");
        assert_ne!(bytes.len(), "USER_NM=홍길동".len());
        assert!(encode("emoji 😀").is_err());
    }
}
