//! Local persisted state: a small JSON key/value document on disk.
//!
//! Holds the interrupted sign-up snapshot, the last visited path marker, and
//! the bearer token. Every write stages to a temporary file and renames it
//! over the document.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::Result;

const STORE_FILE: &str = "local_storage.json";
const TMP_SUFFIX: &str = "tmp";

pub const USER_DATA_KEY: &str = "userData";
pub const PATH_KEY: &str = "path";
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Opens (without creating) the store document inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.read_entries()?;
        match entries.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set_item<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_entries(&entries)
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn set_user<T: Serialize>(&self, snapshot: &T) -> Result<()> {
        self.set_item(USER_DATA_KEY, snapshot)
    }

    pub fn user<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.get_item(USER_DATA_KEY)
    }

    pub fn set_path(&self, marker: &str) -> Result<()> {
        self.set_item(PATH_KEY, &marker)
    }

    pub fn last_path(&self) -> Result<Option<String>> {
        self.get_item(PATH_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set_item(TOKEN_KEY, &token)
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.get_item(TOKEN_KEY)
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Draft {
        first_name: String,
    }

    #[test]
    fn missing_document_reads_as_empty() {
        let temp = tempdir().unwrap();
        let store = LocalStore::in_dir(temp.path());
        assert_eq!(store.last_path().unwrap(), None);
        assert_eq!(store.user::<Draft>().unwrap(), None);
    }

    #[test]
    fn items_survive_reopening() {
        let temp = tempdir().unwrap();
        let store = LocalStore::in_dir(temp.path().join("nested"));
        store
            .set_user(&Draft {
                first_name: "Amani".into(),
            })
            .unwrap();
        store.set_path("sign-up").unwrap();

        let reopened = LocalStore::in_dir(temp.path().join("nested"));
        assert_eq!(reopened.last_path().unwrap().as_deref(), Some("sign-up"));
        assert_eq!(
            reopened.user::<Draft>().unwrap(),
            Some(Draft {
                first_name: "Amani".into()
            })
        );
        assert!(!tmp_path(reopened.path()).exists());
    }

    #[test]
    fn remove_and_clear() {
        let temp = tempdir().unwrap();
        let store = LocalStore::in_dir(temp.path());
        store.set_token("abc").unwrap();
        store.set_path("sign-up").unwrap();
        store.remove_item(TOKEN_KEY).unwrap();
        assert_eq!(store.token().unwrap(), None);
        assert!(store.last_path().unwrap().is_some());

        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
