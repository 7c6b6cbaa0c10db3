use super::backend::StorageBackend;
use crate::error::{LunchError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FILE_EXT: &str = ".json";

/// Stores each key as `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(LunchError::Store(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}{}", key, FILE_EXT)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(value)?;

        // Atomic write: temp file in the same directory, then rename
        let tmp_file = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        if let Err(e) = fs::rename(&tmp_file, &path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn list_keys(&self) -> Result<BTreeSet<String>> {
        let mut keys = BTreeSet::new();
        if !self.root.exists() {
            return Ok(keys);
        }
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = name.strip_suffix(FILE_EXT) {
                keys.insert(key.to_string());
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        assert!(backend.save("../escape", &json!(1)).is_err());
        assert!(backend.load(".hidden").is_err());
        assert!(backend.delete("").is_err());
    }

    #[test]
    fn test_list_keys_skips_other_files() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        backend.save("default.orders", &json!([])).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join(".default.orders-abc.tmp"), "x").unwrap();

        let keys: Vec<String> = backend.list_keys().unwrap().into_iter().collect();
        assert_eq!(keys, vec!["default.orders".to_string()]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("not-yet"));
        assert!(backend.list_keys().unwrap().is_empty());
        assert_eq!(backend.load("default.orders").unwrap(), None);
        assert!(!backend.delete("default.orders").unwrap());
    }
}
