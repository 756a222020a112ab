//! Task file (.dat) use cases

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use countermax_domain::model::{ConfigTree, TaskDocument, TaskRecord};
use countermax_domain::repository::TaskFileRepository;
use countermax_domain::service::users::display_name;
use countermax_types::{Error, Result};

use super::survey_service::{find_site, preview};

/// Zero-filled record for one site, one section per realized direction.
/// USER_NM comes from the user list; unknown operators get an empty name.
pub fn build_task_record(
    tree: &ConfigTree,
    sn: &str,
    sequence: usize,
    user_id: &str,
    rec_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<TaskRecord> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(Error::InvalidInput("operator id is required".to_string()));
    }
    let site = find_site(tree, sn, sequence)?;
    let mut record = TaskRecord::new(sn, site.work_order_id.clone(), user_id, rec_date, now);
    record.user_name = display_name(&tree.users, user_id);
    record.seq_no = i64::from(site.sequence);
    record.state = site.state.code();
    record.matrices = preview(tree, sn, sequence)?
        .iter()
        .map(|pane| pane.count_matrix())
        .collect();
    Ok(record)
}

pub fn write_task_file<R: TaskFileRepository>(
    repo: &R,
    tree: &ConfigTree,
    sn: &str,
    sequence: usize,
    user_id: &str,
    rec_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let record = build_task_record(tree, sn, sequence, user_id, rec_date, now)?;
    repo.write(&record)
}

pub fn list_task_files<R: TaskFileRepository>(repo: &R, sn: &str) -> Result<Vec<String>> {
    repo.list(sn)
}

pub fn read_task_file<R: TaskFileRepository>(repo: &R, sn: &str, doc_no: &str) -> Result<TaskDocument> {
    repo.read(sn, doc_no)
}
