//! Repository trait definitions for data persistence

use std::path::PathBuf;

use crate::model::{ConfigTree, TaskDocument, TaskRecord};
use countermax_types::Error;

/// Whole-document store for the configuration tree
pub trait ConfigTreeRepository {
    /// Load the tree; a store that does not exist yet yields the default tree
    fn load(&self) -> Result<ConfigTree, Error>;

    /// Replace the stored tree with `tree`
    fn save(&self, tree: &ConfigTree) -> Result<(), Error>;
}

/// Store for per-work-order task files (.dat)
pub trait TaskFileRepository {
    /// Write the record, replacing any existing file; returns its path
    fn write(&self, record: &TaskRecord) -> Result<PathBuf, Error>;

    /// Read a task file back by survey and document number
    fn read(&self, survey_no: &str, doc_no: &str) -> Result<TaskDocument, Error>;

    /// Document numbers stored for a survey task
    fn list(&self, survey_no: &str) -> Result<Vec<String>, Error>;
}
