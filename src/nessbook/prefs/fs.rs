use super::PreferenceStore;
use crate::error::{NessbookError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const PREFS_FILENAME: &str = "prefs.json";

/// Preferences kept as a JSON object in `<root>/prefs.json`.
///
/// The file is re-read on every access so several invocations can share it.
pub struct FilePreferenceStore {
    root: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(PREFS_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(NessbookError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let file = self.path();
        if !file.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(file).map_err(NessbookError::Io)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let values = serde_json::from_str(&content).map_err(|e| {
            NessbookError::Store(format!("{} is unreadable: {}", self.path().display(), e))
        })?;
        Ok(values)
    }

    /// Like `load`, but an unreadable file counts as empty so the next write
    /// replaces it. The flag reports whether that happened.
    fn load_for_write(&self) -> Result<(BTreeMap<String, String>, bool)> {
        match self.load() {
            Ok(values) => Ok((values, false)),
            Err(NessbookError::Store(msg)) => {
                log::warn!("{}, starting from empty preferences", msg);
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(values).map_err(NessbookError::Serialization)?;
        fs::write(self.path(), content).map_err(NessbookError::Io)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (mut values, _) = self.load_for_write()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let (mut values, repaired) = self.load_for_write()?;
        if values.remove(key).is_some() || repaired {
            self.save(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DisplayOrderEntry;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferenceStore::new(dir.path().join("nested"));
        assert_eq!(prefs.get("anything").unwrap(), None);
    }

    #[test]
    fn values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let mut prefs = FilePreferenceStore::new(dir.path().to_path_buf());
        prefs.set("access_token", "t0k3n").unwrap();

        let reopened = FilePreferenceStore::new(dir.path().to_path_buf());
        assert_eq!(reopened.get("access_token").unwrap().as_deref(), Some("t0k3n"));
    }

    #[test]
    fn remove_deletes_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut prefs = FilePreferenceStore::new(dir.path().to_path_buf());
        prefs.set("a", "1").unwrap();
        prefs.set("b", "2").unwrap();
        prefs.remove("a").unwrap();

        assert_eq!(prefs.get("a").unwrap(), None);
        assert_eq!(prefs.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_does_not_break_order_reads() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFS_FILENAME), "][").unwrap();
        let prefs = FilePreferenceStore::new(dir.path().to_path_buf());

        assert!(matches!(prefs.get("k"), Err(NessbookError::Store(_))));
        assert_eq!(prefs.get_order("k"), None);
    }

    #[test]
    fn writes_replace_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFS_FILENAME), "][").unwrap();
        let mut prefs = FilePreferenceStore::new(dir.path().to_path_buf());

        prefs.set("access_token", "tok").unwrap();
        assert_eq!(prefs.get("access_token").unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn remove_on_corrupt_file_leaves_it_readable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFS_FILENAME), "][").unwrap();
        let mut prefs = FilePreferenceStore::new(dir.path().to_path_buf());

        prefs.remove("missing").unwrap();
        assert_eq!(prefs.get("missing").unwrap(), None);
    }

    #[test]
    fn order_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut prefs = FilePreferenceStore::new(dir.path().to_path_buf());
        let entries = vec![DisplayOrderEntry {
            id: "a".into(),
            order: 0,
        }];
        prefs.set_order("bookOrder_me", &entries).unwrap();

        let reopened = FilePreferenceStore::new(dir.path().to_path_buf());
        assert_eq!(reopened.get_order("bookOrder_me"), Some(entries));
    }
}
