// Common test utilities and helpers

#![allow(dead_code)]

use pref_migrator::prelude::*;

/// Replace the whole content of `store` with `pairs`.
pub fn init_prefs(store: &mut dyn PreferenceStore, pairs: &[(&str, PrefValue)]) {
    store.clear().unwrap();
    for (key, value) in pairs {
        store.put(key, value.clone()).unwrap();
    }
}

/// Assert `store` holds exactly `pairs`, nothing more.
pub fn assert_prefs(store: &dyn PreferenceStore, pairs: &[(&str, PrefValue)]) {
    let expected: Snapshot = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    assert_eq!(store.entries().unwrap(), expected);
}

pub fn assert_prefs_empty(store: &dyn PreferenceStore) {
    assert!(
        store.is_empty().unwrap(),
        "expected empty store, found {:?}",
        store.entries().unwrap()
    );
}

/// Three empty in-memory stores.
pub struct Stores {
    pub general: MemoryStore,
    pub admin: MemoryStore,
    pub meta: MemoryStore,
}

impl Stores {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            general: MemoryStore::new(),
            admin: MemoryStore::new(),
            meta: MemoryStore::new(),
        }
    }

    pub fn run_migrations(&mut self) -> MigrationReport {
        PreferenceMigrator::collect().migrate(&mut self.general, &mut self.admin, &mut self.meta)
    }
}
