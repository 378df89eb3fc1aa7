use super::atomic_file::{AtomicFile, FileFormat};
use std::collections::BTreeMap;
use std::path::PathBuf;
use towork_core::Result;
use towork_core::session::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// Session scope stored as a flat JSON object.
///
/// An unreadable file is logged and treated as empty on read; the next
/// write replaces it.
pub struct FileKeyValueStore {
    file: AtomicFile<Entries>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path, FileFormat::Json),
        }
    }

    fn entries(&self) -> Entries {
        match self.file.load() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.file.path().display(),
                    e
                );
                Entries::new()
            }
        }
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries),
    {
        if self.file.load().is_err() {
            self.file.save(&Entries::new())?;
        }
        self.file.update(Entries::new(), f)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn values_survive_a_new_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let store = FileKeyValueStore::new(path.clone());
        store.set("token", "abc").unwrap();
        store.set("role", "ROLE_CLIENT").unwrap();
        store.remove("role").unwrap();

        let reopened = FileKeyValueStore::new(path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
        assert!(reopened.get("role").unwrap().is_none());
    }

    #[test]
    fn remove_on_missing_file_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        FileKeyValueStore::new(path.clone()).remove("token").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::new(path);
        assert!(store.get("token").unwrap().is_none());
        store.set("token", "fresh").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("fresh"));
    }
}
