use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::{Result, SessionStorage, StorageError};

/// Session storage backed by a directory, one file per slot.
///
/// The directory is created by the first write; a session that is only read
/// leaves nothing on disk. Writes go to a temporary file that is renamed over
/// the slot, so a reader sees either the previous or the new value, never a
/// partial write.
#[derive(Debug, Clone)]
pub struct DirectorySessionStorage {
    root: PathBuf,
}

impl DirectorySessionStorage {
    /// Opens the session directory at `root`.
    ///
    /// Fails if `root` exists and is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() && !root.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            )
            .into());
        }
        Ok(Self { root })
    }

    /// Returns true once a slot has been written.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Returns the session directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl SessionStorage for DirectorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let temp_path = path.with_extension("json.tmp");
        fs::create_dir_all(&self.root)?;

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        tracing::trace!(key, path = %path.display(), "session slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
