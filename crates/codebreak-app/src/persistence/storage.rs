use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use super::PersistenceError;

/// A key/value store for UTF-8 documents.
pub trait Storage {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_string(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;

    /// Makes previous writes durable.
    ///
    /// # Errors
    ///
    /// Returns an error if pending writes cannot be completed.
    fn flush(&mut self) -> Result<(), PersistenceError>;
}

/// Volatile storage backed by a map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.values.remove(key);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Storage keeping one `<key>.json` file per key in a directory.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        key: key.to_owned(),
        source,
    }
}

impl Storage for FileStorage {
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key)(err)),
        }
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(key))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_error(key))?;
        fs::rename(&tmp, &path).map_err(io_error(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path(key)?) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(io_error(key)(err)),
            _ => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::process;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("codebreak-{name}-{}", process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_string("a").unwrap(), None);
        storage.set_string("a", "1".to_owned()).unwrap();
        assert_eq!(storage.get_string("a").unwrap().as_deref(), Some("1"));
        storage.remove("a").unwrap();
        storage.remove("a").unwrap();
        assert_eq!(storage.get_string("a").unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = temp_dir("file-storage");
        let mut storage = FileStorage::new(&dir);
        assert_eq!(storage.get_string("session").unwrap(), None);

        storage.set_string("session", "{}".to_owned()).unwrap();
        storage.set_string("session", "[1]".to_owned()).unwrap();
        storage.flush().unwrap();
        assert_eq!(storage.get_string("session").unwrap().as_deref(), Some("[1]"));
        assert!(dir.join("session.json").is_file());
        assert!(!dir.join("session.json.tmp").exists());

        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.get_string("session").unwrap().as_deref(), Some("[1]"));

        storage.remove("session").unwrap();
        storage.remove("session").unwrap();
        assert_eq!(storage.get_string("session").unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let mut storage = FileStorage::new(temp_dir("bad-key"));
        assert!(matches!(
            storage.set_string("../escape", String::new()),
            Err(PersistenceError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get_string(""),
            Err(PersistenceError::InvalidKey(_))
        ));
    }
}
