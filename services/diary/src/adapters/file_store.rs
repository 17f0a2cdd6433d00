//! services/diary/src/adapters/file_store.rs
//!
//! A `KeyValueStore` that keeps each key in its own JSON file inside a data
//! directory. Writes go to a temporary file first and are renamed into place,
//! so a reader never observes a half-written record.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use manga_diary_core::ports::{KeyValueStore, PortError, PortResult};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                c if c.is_ascii_alphanumeric() => c,
                '.' | '_' | '-' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir).map_err(|e| PortError::Storage(e.to_string()))?;
        fs::write(&tmp, value).map_err(|e| PortError::Storage(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| PortError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("manga_diary.history").unwrap(), None);
    }

    #[test]
    fn set_creates_the_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("manga_diary.history", "[1]").unwrap();
        store.set("manga_diary.history", "[2]").unwrap();

        assert_eq!(
            store.get("manga_diary.history").unwrap().as_deref(),
            Some("[2]")
        );
        assert!(store.path_for("manga_diary.history").ends_with("manga_diary.history.json"));
        assert!(!store.path_for("manga_diary.history").with_extension("json.tmp").exists());
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let store = FileStore::new("/data");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/data/.._etc_passwd.json"));
    }
}
