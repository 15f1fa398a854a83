//! The key-value store abstraction every backend implements.

use crate::error::PrefsResult;
use crate::value::PrefValue;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Snapshot of a whole store, ordered by key.
pub type Snapshot = BTreeMap<String, PrefValue>;

/// Logical name of one of the three settings stores.
///
/// The string form doubles as the sled tree name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StoreName {
    /// User-facing settings.
    General,
    /// Settings controlling which user-facing settings are visible.
    Admin,
    /// Internal bookkeeping the user never sees.
    Meta,
}

/// What [`PreferenceStore::entries_lossy`] could read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LossySnapshot {
    pub entries: Snapshot,
    /// Keys whose stored value could not be decoded, with the reason.
    pub unreadable: BTreeMap<String, String>,
}

/// A named mapping from string key to [`PrefValue`].
///
/// Implementations must be usable as trait objects: the migrator holds the
/// three stores as `&mut dyn PreferenceStore` so they may be backed by
/// different engines.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> PrefsResult<Option<PrefValue>>;

    fn put(&mut self, key: &str, value: PrefValue) -> PrefsResult<()>;

    /// Remove a key, returning the previous value if there was one.
    fn remove(&mut self, key: &str) -> PrefsResult<Option<PrefValue>>;

    /// Every entry currently in the store. Fails if any value is unreadable.
    fn entries(&self) -> PrefsResult<Snapshot>;

    /// Like [`entries`](Self::entries), but entries that cannot be decoded are
    /// set aside in [`LossySnapshot::unreadable`] instead of failing the read.
    ///
    /// Backends that cannot hold undecodable data keep this default.
    fn entries_lossy(&self) -> PrefsResult<LossySnapshot> {
        Ok(LossySnapshot {
            entries: self.entries()?,
            unreadable: BTreeMap::new(),
        })
    }

    fn contains(&self, key: &str) -> PrefsResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn is_empty(&self) -> PrefsResult<bool> {
        Ok(self.entries()?.is_empty())
    }

    fn clear(&mut self) -> PrefsResult<()> {
        for key in self.entries()?.into_keys() {
            self.remove(&key)?;
        }
        Ok(())
    }

    /// Make pending writes durable. In-memory stores have nothing to do.
    fn flush(&mut self) -> PrefsResult<()> {
        Ok(())
    }
}
