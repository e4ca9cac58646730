//! # Filesystem-backed key/value store
//!
//! [`FileKv`] is the [`KeyValueStore`] used on native hosts so the session
//! survives restarts. Each key is one file holding the raw value.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── kv/
//!     └── <key>          # raw value, usually JSON
//! ```
//!
//! Use [`dirs::data_dir()`](https://docs.rs/dirs) to obtain a
//! platform-appropriate base, e.g. `~/.local/share/community-hub/` on Linux.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::local::KeyValueStore;

/// Filesystem-backed KeyValueStore for native persistence.
#[derive(Clone, Debug)]
pub struct FileKv {
    base: PathBuf,
}

impl FileKv {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn kv_dir(&self) -> PathBuf {
        self.base.join("kv")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.kv_dir().join(safe)
    }
}

impl KeyValueStore for FileKv {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(self.kv_dir())?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "community_hub_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_kv_roundtrip() {
        let dir = scratch_dir("roundtrip");

        let kv = FileKv::new(dir.clone());
        assert_eq!(kv.get_raw("session").unwrap(), None);
        kv.set_raw("session", r#"{"a":1}"#).unwrap();

        // Re-open from same directory
        let reopened = FileKv::new(dir.clone());
        assert_eq!(
            reopened.get_raw("session").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );

        reopened.remove("session").unwrap();
        reopened.remove("session").unwrap();
        assert_eq!(reopened.get_raw("session").unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_keys_cannot_escape_base_dir() {
        let kv = FileKv::new(PathBuf::from("/base"));
        assert_eq!(kv.key_path("../etc/passwd"), PathBuf::from("/base/kv/___etc_passwd"));
    }
}
