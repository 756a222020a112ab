//! Persistent JSON documents under the data root

pub mod hotkeys;

pub use hotkeys::{HotkeysDb, HOTKEYS_DB_FILE, HOTKEYS_DB_VERSION};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use countermax_types::Result;

/// File name of the configuration tree under the data root
pub const CONFIG_TREE_FILE: &str = "env_data_plus_allinone.json";

/// One JSON document read and written as a whole.
///
/// Writes go to a sibling temporary file that is renamed over the target, so
/// readers never observe a half-written document. There is no locking: two
/// processes saving the same document overwrite each other.
pub struct JsonStore<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _doc: PhantomData,
        }
    }

    /// Store for the configuration tree in `data_root`
    pub fn in_data_root(data_root: &Path) -> Self {
        Self::new(data_root.join(CONFIG_TREE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the document; `None` if the file does not exist.
    ///
    /// A file that exists but does not parse is an error, never replaced.
    pub fn read(&self) -> Result<Option<T>> {
        if !self.exists() {
            debug!(path = %self.path.display(), "document not found");
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let doc = serde_json::from_reader(reader)?;
        Ok(Some(doc))
    }

    pub fn write(&self, doc: &T) -> Result<()> {
        write_json_atomic(&self.path, doc)?;
        info!(path = %self.path.display(), "document saved");
        Ok(())
    }
}

/// Pretty-print `value` to `path` via a temporary file and rename
pub fn write_json_atomic<V: Serialize + ?Sized>(path: &Path, value: &V) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
    }

    #[test]
    fn test_tmp_path_is_sibling() {
        let p = tmp_path(Path::new("/data/env.json"));
        assert_eq!(p, PathBuf::from("/data/env.json.tmp"));
    }

    #[test]
    fn test_missing_document_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_data_root(dir.path());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Doc> = JsonStore::new(dir.path().join("nested").join("doc.json"));
        store.write(&Doc { name: "교차로".into() }).unwrap();
        assert_eq!(store.read().unwrap(), Some(Doc { name: "교차로".into() }));
        assert!(!dir.path().join("nested").join("doc.json.tmp").exists());
    }

    #[test]
    fn test_malformed_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Doc> = JsonStore::in_data_root(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.read().is_err());
        // left in place for the operator to inspect
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }
}
