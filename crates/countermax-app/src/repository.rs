//! Repository adapters for persistence layer

use std::path::{Path, PathBuf};

use countermax_infra::persistence::{FileConfigTreeRepository, FileTaskRepository};
use countermax_types::Result;

use crate::app::ConfigSession;
use crate::config::Config;

/// Open the configuration tree repository in the configured data root
pub fn open_config_repo(config: &Config) -> Result<FileConfigTreeRepository> {
    let data_root = config.data_root()?;
    open_config_repo_at(data_root, config.export_hotkeys_db)
}

/// Open the configuration tree repository at a custom directory
pub fn open_config_repo_at(data_root: PathBuf, export_hotkeys: bool) -> Result<FileConfigTreeRepository> {
    Ok(FileConfigTreeRepository::open(data_root)?.with_hotkeys_export(export_hotkeys))
}

/// Read-modify-write session over the configured data root
pub fn open_session(config: &Config) -> Result<ConfigSession<FileConfigTreeRepository>> {
    Ok(ConfigSession::new(open_config_repo(config)?))
}

/// Open the task file repository in the configured data root
pub fn open_task_repo(config: &Config) -> Result<FileTaskRepository> {
    let data_root = config.data_root()?;
    Ok(open_task_repo_at(&data_root))
}

pub fn open_task_repo_at(data_root: &Path) -> FileTaskRepository {
    FileTaskRepository::new(data_root)
}
