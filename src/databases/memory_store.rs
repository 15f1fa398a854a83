//! In-memory preference store.
//!
//! Used for tests and for settings that never need to outlive the process.

use crate::error::PrefsResult;
use crate::traits::store::{PreferenceStore, Snapshot};
use crate::value::PrefValue;

/// `BTreeMap` backed [`PreferenceStore`].
///
/// # Examples
///
/// ```
/// use pref_migrator::databases::memory_store::MemoryStore;
/// use pref_migrator::traits::store::PreferenceStore;
///
/// let mut store = MemoryStore::from_pairs([("protocol", "odk_default".into())]);
/// assert!(store.contains("protocol").unwrap());
/// store.remove("protocol").unwrap();
/// assert!(store.is_empty().unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: Snapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(key, value)` pairs; later pairs win on duplicate keys.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PrefValue)>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.entries
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> PrefsResult<Option<PrefValue>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: PrefValue) -> PrefsResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PrefsResult<Option<PrefValue>> {
        Ok(self.entries.remove(key))
    }

    fn entries(&self) -> PrefsResult<Snapshot> {
        Ok(self.entries.clone())
    }

    fn clear(&mut self) -> PrefsResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut store = MemoryStore::new();
        store.put("autosend", "off".into()).unwrap();
        assert_eq!(store.get("autosend").unwrap(), Some(PrefValue::from("off")));

        let previous = store.remove("autosend").unwrap();
        assert_eq!(previous, Some(PrefValue::from("off")));
        assert_eq!(store.get("autosend").unwrap(), None);
        assert_eq!(store.remove("autosend").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = MemoryStore::from_pairs([("maps", PrefValue::Bool(true))]);
        store.put("maps", PrefValue::Bool(false)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("maps").unwrap(), Some(PrefValue::Bool(false)));
    }

    #[test]
    fn test_clear_and_is_empty() {
        let mut store = MemoryStore::from_pairs([
            ("firstRun", PrefValue::Bool(true)),
            ("lastVersion", PrefValue::Long(1)),
        ]);
        assert!(!store.is_empty().unwrap());
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }
}
