//! # Local Profile Storage
//!
//! JSON key-value persistence under the profile directory: one `<key>.json`
//! file per key, default root `~/.atlas/store`.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash
//! safety. Single-process model: no cross-process locking, so concurrent
//! writers from separate processes are not supported.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key-to-file store for the persisted collections (account registry,
/// session snapshot, favorites mirrors).
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Returns `~/.atlas/store`.
    pub fn default_dir() -> io::Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
        Ok(home.join(".atlas").join("store"))
    }

    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens the store at the default profile location.
    pub fn open_default() -> io::Result<Self> {
        Self::open(Self::default_dir()?)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    /// Reads and decodes a key. `Ok(None)` when the key is absent; a present
    /// but malformed value is an `InvalidData` error, left to the caller to
    /// recover (the session store discards such records).
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> io::Result<Option<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Atomically writes `value` as JSON under `key` (via `.tmp` + rename).
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        let path = self.key_path(key);
        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Removes a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
