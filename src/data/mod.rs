//! Persistence of accepted configuration payloads under `config_files/`

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::core::storage::{AppStorage, DataSubdir};
use crate::error::{EngineError, Result};

/// Writes every accepted configuration load to its own file under
/// `<data_dir>/config_files/`, named by the caller or generated from the
/// current timestamp when no name is supplied.
pub struct ConfigFileStore {
    storage: AppStorage,
}

impl ConfigFileStore {
    pub fn new(storage: AppStorage) -> Self {
        Self { storage }
    }

    /// Persist `text` under `config_files/<name>`, overwriting any existing
    /// file of the same name. Returns the path written to.
    pub fn persist(&self, name: Option<&str>, text: &str) -> Result<PathBuf> {
        let file_name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("{}.conf", Utc::now().format("%Y%m%dT%H%M%S%.6f")),
        };
        let path = self.storage.subdir_path(DataSubdir::ConfigFiles, &file_name);
        fs::write(&path, text).map_err(EngineError::Io)?;
        tracing::debug!(path = %path.display(), "persisted configuration load");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_with_caller_supplied_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config_files")).unwrap();
        let storage = AppStorage::init_for_test(dir.path().to_path_buf());
        let store = ConfigFileStore::new(storage);

        let path = store.persist(Some("first.conf"), "add\nA,B\nS").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "add\nA,B\nS");
        assert!(path.ends_with("config_files/first.conf"));
    }

    #[test]
    fn generates_a_name_when_none_supplied() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config_files")).unwrap();
        let storage = AppStorage::init_for_test(dir.path().to_path_buf());
        let store = ConfigFileStore::new(storage);

        let path = store.persist(None, "inc\nA\nB").unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".conf"));
    }

    #[test]
    fn same_name_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config_files")).unwrap();
        let storage = AppStorage::init_for_test(dir.path().to_path_buf());
        let store = ConfigFileStore::new(storage);

        store.persist(Some("cfg.conf"), "inc\nA\nB").unwrap();
        let path = store.persist(Some("cfg.conf"), "inc\nC\nD").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "inc\nC\nD");
    }
}
