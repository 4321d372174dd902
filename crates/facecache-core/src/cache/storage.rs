//! Raw key/value storage backends.
//!
//! `Storage` is the flat, string-valued store the cache sits on. It knows
//! nothing about TTLs or JSON; `CacheStore` layers those on top.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};

/// Flat key/value store scoped to one user profile.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}

// ============================================================================
// File storage
// ============================================================================

/// One JSON file per key inside a directory.
///
/// Keys such as `cache:personPhotos:abc` are percent-encoded into portable
/// file names (`cache%3ApersonPhotos%3Aabc.json`).
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read cache file for {}", key)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path(key), value)
            .with_context(|| format!("Failed to write cache file for {}", key))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove cache file for {}", key)),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list cache directory: {}", self.dir.display()))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_key) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

fn decode_key(name: &str) -> Option<String> {
    urlencoding::decode(name).ok().map(|key| key.into_owned())
}

// ============================================================================
// In-memory storage
// ============================================================================

/// In-process storage with an optional size quota, mirroring a browser's
/// per-origin storage limit.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes once keys plus values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries()?;
        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > quota {
                bail!("Storage quota exceeded ({} of {} bytes)", needed, quota);
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encoding_round_trips_namespace_keys() {
        for key in ["cache:persons", "cache:personPhotos:a/b c", "cache:personPhotos:émile", "plain-key_1"] {
            let encoded = encode_key(key);
            assert!(encoded.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_.~%".contains(&b)));
            assert_eq!(decode_key(&encoded).as_deref(), Some(key));
        }
        assert_eq!(encode_key("cache:persons"), "cache%3Apersons");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert_eq!(decode_key("abc%FF"), None);
    }

    #[test]
    fn test_file_storage_read_write_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("cache")).expect("storage");

        assert_eq!(storage.read("cache:persons").expect("read"), None);

        storage.write("cache:persons", "[1,2,3]").expect("write");
        storage.write("cache:personPhotos:p-1", "{}").expect("write");
        assert_eq!(storage.read("cache:persons").expect("read").as_deref(), Some("[1,2,3]"));
        assert_eq!(
            storage.keys().expect("keys"),
            vec!["cache:personPhotos:p-1".to_string(), "cache:persons".to_string()]
        );

        storage.remove("cache:persons").expect("remove");
        storage.remove("cache:persons").expect("second remove is a no-op");
        assert_eq!(storage.read("cache:persons").expect("read"), None);
    }

    #[test]
    fn test_file_storage_ignores_foreign_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).expect("storage");
        std::fs::write(dir.path().join("facecache.log"), "log line").expect("write log");
        storage.write("cache:persons", "[]").expect("write");

        assert_eq!(storage.keys().expect("keys"), vec!["cache:persons".to_string()]);
    }

    #[test]
    fn test_memory_storage_quota() {
        let storage = MemoryStorage::with_quota(20);
        storage.write("a", "0123456789").expect("fits");
        assert!(storage.write("b", "0123456789").is_err());
        // Overwriting an existing key only counts the new value
        storage.write("a", "012345678901234").expect("overwrite fits");
        assert_eq!(storage.read("b").expect("read"), None);
    }
}
