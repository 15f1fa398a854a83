//! Sled backend for the preference stores.
//!
//! ## Architecture
//!
//! One sled database holds all three stores, each in its own tree named after
//! the [`StoreName`] (`general`, `admin`, `meta`). Keys are the raw UTF-8 bytes
//! of the setting key; values are bincode-encoded [`PrefValue`]s.
//!
//! ## Usage
//!
//! ```no_run
//! use pref_migrator::databases::sled_store::SledPreferenceDatabase;
//! use pref_migrator::migrator::PreferenceMigrator;
//!
//! let db = SledPreferenceDatabase::new("./data/settings")?;
//! let report = db.migrate(&PreferenceMigrator::collect())?;
//! assert!(report.is_clean());
//! # Ok::<(), pref_migrator::error::PrefsError>(())
//! ```

use crate::config::SledConfig;
use crate::error::{PrefsError, PrefsResult};
use crate::migrator::{MigrationReport, PreferenceMigrator};
use crate::traits::store::{LossySnapshot, PreferenceStore, Snapshot, StoreName};
use crate::value::PrefValue;
use log::{debug, warn};
use std::path::Path;
use std::time::Instant;

// =============================================================================
// Serialization Helpers
// =============================================================================

/// Serialize a value to bytes using bincode's standard configuration.
#[inline]
pub(crate) fn serialize_value(value: &PrefValue) -> PrefsResult<Vec<u8>> {
    bincode::encode_to_vec(value, bincode::config::standard()).map_err(|e| e.into())
}

/// Deserialize a value from bytes; `key` is only used for the error.
#[inline]
pub(crate) fn deserialize_value(key: &str, bytes: &[u8]) -> PrefsResult<PrefValue> {
    let (value, _len) = bincode::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|source| PrefsError::Decode {
            key: key.to_string(),
            source,
        })?;
    Ok(value)
}

// =============================================================================
// SledPreferenceDatabase
// =============================================================================

/// A sled database holding the general, admin and meta stores.
///
/// Sled's `Db` uses `Arc` internally, so the trees handed out by
/// [`store`](Self::store) stay valid for as long as any of them is alive.
#[derive(Debug, Clone)]
pub struct SledPreferenceDatabase {
    db: sled::Db,
}

impl SledPreferenceDatabase {
    pub fn open(config: &SledConfig) -> PrefsResult<Self> {
        config.validate()?;
        let start = Instant::now();

        let mut sled_config = sled::Config::new()
            .temporary(config.temporary)
            .cache_capacity(config.cache_capacity_bytes)
            .flush_every_ms(config.flush_every_ms);
        if !config.path.as_os_str().is_empty() {
            sled_config = sled_config.path(&config.path);
        }
        let db = sled_config.open()?;

        debug!(
            "Opened preference database at {} in {:?}",
            config.path.display(),
            start.elapsed()
        );
        Ok(Self { db })
    }

    /// Open (or create) a persistent database at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> PrefsResult<Self> {
        Self::open(&SledConfig::new(path.as_ref()))
    }

    /// Create a database that is deleted when dropped (useful for testing)
    pub fn temp() -> PrefsResult<Self> {
        Self::open(&SledConfig::temp())
    }

    /// Get direct access to the underlying sled database
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    pub fn store(&self, name: StoreName) -> PrefsResult<SledPreferences> {
        let tree = self.db.open_tree(name.to_string())?;
        Ok(SledPreferences { name, tree })
    }

    /// Run `migrator` over the three trees of this database.
    ///
    /// Only opening the trees can fail; the pass itself never does.
    pub fn migrate(&self, migrator: &PreferenceMigrator) -> PrefsResult<MigrationReport> {
        let mut general = self.store(StoreName::General)?;
        let mut admin = self.store(StoreName::Admin)?;
        let mut meta = self.store(StoreName::Meta)?;
        Ok(migrator.migrate(&mut general, &mut admin, &mut meta))
    }

    /// Flush the database to disk
    pub fn flush(&self) -> PrefsResult<usize> {
        Ok(self.db.flush()?)
    }
}

// =============================================================================
// SledPreferences
// =============================================================================

/// One store backed by a sled tree.
#[derive(Debug, Clone)]
pub struct SledPreferences {
    name: StoreName,
    tree: sled::Tree,
}

impl SledPreferences {
    pub fn name(&self) -> StoreName {
        self.name
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }
}

impl PreferenceStore for SledPreferences {
    fn get(&self, key: &str) -> PrefsResult<Option<PrefValue>> {
        self.tree
            .get(key.as_bytes())?
            .map(|bytes| deserialize_value(key, &bytes))
            .transpose()
    }

    fn put(&mut self, key: &str, value: PrefValue) -> PrefsResult<()> {
        self.tree.insert(key.as_bytes(), serialize_value(&value)?)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PrefsResult<Option<PrefValue>> {
        self.tree
            .remove(key.as_bytes())?
            .map(|bytes| deserialize_value(key, &bytes))
            .transpose()
    }

    fn entries(&self) -> PrefsResult<Snapshot> {
        let mut entries = Snapshot::new();
        for item in self.tree.iter() {
            let (key_bytes, value_bytes) = item?;
            let key = String::from_utf8(key_bytes.to_vec()).map_err(|_| {
                PrefsError::InvalidKey(format!("non UTF-8 key in {} store", self.name))
            })?;
            let value = deserialize_value(&key, &value_bytes)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    fn entries_lossy(&self) -> PrefsResult<LossySnapshot> {
        let mut read = LossySnapshot::default();
        for item in self.tree.iter() {
            let (key_bytes, value_bytes) = item?;
            let key = match std::str::from_utf8(&key_bytes) {
                Ok(key) => key.to_string(),
                Err(_) => {
                    let key = String::from_utf8_lossy(&key_bytes).into_owned();
                    warn!("Skipping non UTF-8 key {:?} in {} store", key, self.name);
                    read.unreadable.insert(key, "non UTF-8 key".to_string());
                    continue;
                }
            };
            match deserialize_value(&key, &value_bytes) {
                Ok(value) => {
                    read.entries.insert(key, value);
                }
                Err(e) => {
                    warn!("Skipping unreadable entry in {} store: {}", self.name, e);
                    read.unreadable.insert(key, e.to_string());
                }
            }
        }
        Ok(read)
    }

    fn contains(&self, key: &str) -> PrefsResult<bool> {
        Ok(self.tree.contains_key(key.as_bytes())?)
    }

    fn is_empty(&self) -> PrefsResult<bool> {
        Ok(self.tree.is_empty())
    }

    fn clear(&mut self) -> PrefsResult<()> {
        Ok(self.tree.clear()?)
    }

    fn flush(&mut self) -> PrefsResult<()> {
        self.tree.flush()?;
        Ok(())
    }
}
