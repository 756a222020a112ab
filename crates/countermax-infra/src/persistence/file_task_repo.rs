//! File-based task repository: `<root>/Projects/<SN>/<DOC_NO>.dat`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use countermax_domain::model::{TaskDocument, TaskRecord};
use countermax_domain::repository::TaskFileRepository;
use countermax_types::{Error, Result};

use crate::task_file;

pub const PROJECTS_DIR: &str = "Projects";
const EXTENSION: &str = "dat";

pub struct FileTaskRepository {
    projects_root: PathBuf,
}

impl FileTaskRepository {
    pub fn new(data_root: &Path) -> Self {
        Self {
            projects_root: data_root.join(PROJECTS_DIR),
        }
    }

    /// Folder holding one survey task's files
    pub fn survey_dir(&self, survey_no: &str) -> Result<PathBuf> {
        let survey_no = survey_no.trim();
        if survey_no.is_empty() {
            return Err(Error::TaskFile("survey number is empty".to_string()));
        }
        if survey_no.contains(['/', '\\']) || survey_no == "." || survey_no == ".." {
            return Err(Error::TaskFile(format!("invalid survey number '{}'", survey_no)));
        }
        Ok(self.projects_root.join(survey_no))
    }

    pub fn path_for(&self, survey_no: &str, doc_no: &str) -> Result<PathBuf> {
        Ok(self
            .survey_dir(survey_no)?
            .join(format!("{}.{}", doc_no, EXTENSION)))
    }
}

impl TaskFileRepository for FileTaskRepository {
    fn write(&self, record: &TaskRecord) -> Result<PathBuf> {
        if record.work_no.trim().is_empty() || record.user_id.trim().is_empty() {
            return Err(Error::TaskFile(
                "work order and operator id are required".to_string(),
            ));
        }
        let dir = self.survey_dir(&record.survey_no)?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(record.file_name());
        let bytes = task_file::encode(&task_file::render(record))?;
        fs::write(&path, bytes)?;
        info!(path = %path.display(), sections = record.matrices.len(), "task file written");
        Ok(path)
    }

    fn read(&self, survey_no: &str, doc_no: &str) -> Result<TaskDocument> {
        let path = self.path_for(survey_no, doc_no)?;
        if !path.is_file() {
            return Err(Error::NotFound(format!("task file {}", path.display())));
        }
        let bytes = fs::read(&path)?;
        task_file::parse(&task_file::decode(&bytes))
    }

    fn list(&self, survey_no: &str) -> Result<Vec<String>> {
        let dir = self.survey_dir(survey_no)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut docs: Vec<String> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect();
        docs.sort();
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(work_no: &str) -> TaskRecord {
        let date = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
        TaskRecord::new("SN_1", work_no, "kim", date, date.and_hms_opt(8, 0, 0).unwrap())
    }

    #[test]
    fn test_write_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(dir.path());
        let path = repo.write(&record("WN_1")).unwrap();
        assert_eq!(
            path,
            dir.path().join("Projects").join("SN_1").join("WN_1_20251205_kim.dat")
        );
    }

    #[test]
    fn test_list_sorted_dat_only() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(dir.path());
        repo.write(&record("WN_2")).unwrap();
        repo.write(&record("WN_1")).unwrap();
        fs::write(repo.survey_dir("SN_1").unwrap().join("notes.txt"), "x").unwrap();
        assert_eq!(
            repo.list("SN_1").unwrap(),
            vec!["WN_1_20251205_kim", "WN_2_20251205_kim"]
        );
        assert!(repo.list("SN_none").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_survey_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(dir.path());
        let mut r = record("WN_1");
        r.survey_no = " ".to_string();
        assert!(matches!(repo.write(&r), Err(Error::TaskFile(_))));
        r.survey_no = "../x".to_string();
        assert!(repo.write(&r).is_err());
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(dir.path());
        assert!(matches!(repo.read("SN_1", "nope"), Err(Error::NotFound(_))));
    }
}
