//! File-based configuration tree repository

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use countermax_domain::model::ConfigTree;
use countermax_domain::repository::ConfigTreeRepository;
use countermax_store::{HotkeysDb, JsonStore};
use countermax_types::Result;

/// Configuration tree stored as `env_data_plus_allinone.json` in the data root.
///
/// Every save also refreshes `hotkeys_db.json` unless disabled. A failed
/// export is logged and does not fail the save.
pub struct FileConfigTreeRepository {
    data_root: PathBuf,
    store: JsonStore<ConfigTree>,
    export_hotkeys: bool,
}

impl FileConfigTreeRepository {
    pub fn open(data_root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_root)?;
        let store = JsonStore::in_data_root(&data_root);
        Ok(Self {
            data_root,
            store,
            export_hotkeys: true,
        })
    }

    pub fn with_hotkeys_export(mut self, enabled: bool) -> Self {
        self.export_hotkeys = enabled;
        self
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn tree_path(&self) -> &Path {
        self.store.path()
    }

    /// Write `hotkeys_db.json` for `tree` now
    pub fn export_hotkeys(&self, tree: &ConfigTree) -> Result<PathBuf> {
        let db = HotkeysDb::new(&tree.projects[..], &tree.surveys[..], Local::now().naive_local());
        let path = db.write(&self.data_root)?;
        info!(path = %path.display(), "hotkeys exported");
        Ok(path)
    }
}

impl ConfigTreeRepository for FileConfigTreeRepository {
    fn load(&self) -> Result<ConfigTree> {
        Ok(self
            .store
            .read()?
            .unwrap_or_else(ConfigTree::with_default_catalog))
    }

    fn save(&self, tree: &ConfigTree) -> Result<()> {
        self.store.write(tree)?;
        if self.export_hotkeys {
            if let Err(e) = self.export_hotkeys(tree) {
                warn!(error = %e, "hotkeys export failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countermax_store::HOTKEYS_DB_FILE;
    use countermax_types::Error;

    #[test]
    fn test_missing_store_loads_default_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileConfigTreeRepository::open(dir.path().to_path_buf()).unwrap();
        let tree = repo.load().unwrap();
        assert_eq!(tree.projects[0].name, "기본 작업");
        assert!(!repo.tree_path().exists());
    }

    #[test]
    fn test_save_exports_hotkeys() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileConfigTreeRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save(&ConfigTree::with_default_catalog()).unwrap();
        assert!(repo.tree_path().exists());
        assert!(dir.path().join(HOTKEYS_DB_FILE).exists());
    }

    #[test]
    fn test_export_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileConfigTreeRepository::open(dir.path().to_path_buf())
            .unwrap()
            .with_hotkeys_export(false);
        repo.save(&ConfigTree::default()).unwrap();
        assert!(!dir.path().join(HOTKEYS_DB_FILE).exists());
    }

    #[test]
    fn test_malformed_store_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileConfigTreeRepository::open(dir.path().to_path_buf()).unwrap();
        std::fs::write(repo.tree_path(), "[1, 2").unwrap();
        assert!(matches!(repo.load(), Err(Error::Json(_))));
    }
}
