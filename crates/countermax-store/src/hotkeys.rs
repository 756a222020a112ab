//! `hotkeys_db.json`: the catalog and survey structure exported for the
//! field-counting application

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use countermax_types::Result;

use crate::write_json_atomic;

pub const HOTKEYS_DB_FILE: &str = "hotkeys_db.json";
pub const HOTKEYS_DB_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct HotkeysDb<'a, P: ?Sized, S: ?Sized> {
    pub version: u32,
    /// "YYYY-MM-DD HH:MM:SS", local time
    pub exported_at: String,
    pub projects: &'a P,
    pub surveys: &'a S,
}

impl<'a, P, S> HotkeysDb<'a, P, S>
where
    P: Serialize + ?Sized,
    S: Serialize + ?Sized,
{
    pub fn new(projects: &'a P, surveys: &'a S, now: NaiveDateTime) -> Self {
        Self {
            version: HOTKEYS_DB_VERSION,
            exported_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            projects,
            surveys,
        }
    }

    /// Write next to the configuration tree; returns the file written
    pub fn write(&self, data_root: &Path) -> Result<PathBuf> {
        let path = hotkeys_db_path(data_root);
        write_json_atomic(&path, self)?;
        Ok(path)
    }
}

/// `<root>/survey/hotkeys_db.json` when a `survey` folder exists, else `<root>/hotkeys_db.json`
pub fn hotkeys_db_path(data_root: &Path) -> PathBuf {
    let survey = data_root.join("survey");
    if survey.is_dir() {
        survey.join(HOTKEYS_DB_FILE)
    } else {
        data_root.join(HOTKEYS_DB_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 5)
            .unwrap()
            .and_hms_opt(14, 25, 23)
            .unwrap()
    }

    #[test]
    fn test_path_prefers_survey_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(hotkeys_db_path(dir.path()), dir.path().join(HOTKEYS_DB_FILE));
        std::fs::create_dir(dir.path().join("survey")).unwrap();
        assert_eq!(
            hotkeys_db_path(dir.path()),
            dir.path().join("survey").join(HOTKEYS_DB_FILE)
        );
    }

    #[test]
    fn test_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let projects = vec![serde_json::json!({"name": "기본 작업"})];
        let surveys: Vec<serde_json::Value> = Vec::new();
        let path = HotkeysDb::new(&projects[..], &surveys[..], now())
            .write(dir.path())
            .unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("기본 작업"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["exported_at"], "2025-12-05 14:25:23");
        assert_eq!(value["projects"][0]["name"], "기본 작업");
        assert!(value["surveys"].as_array().unwrap().is_empty());
    }
}
