//! The startup migration pass over the general, admin and meta stores.
//!
//! [`PreferenceMigrator::migrate`] never returns an error. Anything that goes
//! wrong inside a rule (an unreadable store, a legacy value no rule knows how
//! to interpret, a failed write) is logged, recorded in the
//! [`MigrationReport`] and the pass moves on to the next rule. Re-running the
//! pass on the next startup picks up whatever was left behind.
//!
//! Stores are read with [`PreferenceStore::entries_lossy`]: a value that
//! cannot be decoded only fails the rules that read its key.

use crate::collect;
use crate::config::MigrationOptions;
use crate::databases::memory_store::MemoryStore;
use crate::error::{PrefsError, PrefsResult};
use crate::traits::migration::{Change, ChangeOp, Plan, Rule, RuleSet};
use crate::traits::store::{LossySnapshot, PreferenceStore, Snapshot, StoreName};
use crate::value::PrefValue;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::time::Instant;
use strum::IntoEnumIterator;

/// What happened to one rule during a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Applied(Vec<Change>),
    Unchanged,
    /// Legacy data the rule could not interpret; left untouched.
    Skipped(String),
    /// The store failed underneath the rule.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleReport {
    pub rule: &'static str,
    pub store: StoreName,
    pub outcome: RuleOutcome,
}

/// Result of a migration pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Whether this was a dry run.
    pub dry_run: bool,
    pub rules: Vec<RuleReport>,
}

impl MigrationReport {
    pub fn applied(&self) -> impl Iterator<Item = &RuleReport> {
        self.rules
            .iter()
            .filter(|r| matches!(r.outcome, RuleOutcome::Applied(_)))
    }

    /// Every change applied (or, in a dry run, planned), in order.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.rules
            .iter()
            .filter_map(|r| match &r.outcome {
                RuleOutcome::Applied(changes) => Some(changes),
                _ => None,
            })
            .flatten()
    }

    pub fn has_changes(&self) -> bool {
        self.changes().next().is_some()
    }

    /// True when no rule was skipped or failed.
    pub fn is_clean(&self) -> bool {
        self.rules.iter().all(|r| {
            matches!(
                r.outcome,
                RuleOutcome::Applied(_) | RuleOutcome::Unchanged
            )
        })
    }

    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.rules
            .iter()
            .find(|r| r.rule == rule)
            .map(|r| &r.outcome)
    }
}

struct StoreSet<'a> {
    general: &'a mut dyn PreferenceStore,
    admin: &'a mut dyn PreferenceStore,
    meta: &'a mut dyn PreferenceStore,
}

impl<'a> StoreSet<'a> {
    fn get(&mut self, name: StoreName) -> &mut (dyn PreferenceStore + 'a) {
        match name {
            StoreName::General => &mut *self.general,
            StoreName::Admin => &mut *self.admin,
            StoreName::Meta => &mut *self.meta,
        }
    }
}

/// Copy of a store for a dry run.
///
/// Keeps the unreadable keys and the read error of the store it was copied
/// from, so rules fail during a dry run exactly where they would fail for real.
struct PreviewStore {
    copy: MemoryStore,
    unreadable: BTreeMap<String, String>,
    read_error: Option<String>,
}

impl PreviewStore {
    fn of(name: StoreName, store: &dyn PreferenceStore) -> Self {
        match store.entries_lossy() {
            Ok(read) => Self {
                copy: MemoryStore::from_pairs(read.entries),
                unreadable: read.unreadable,
                read_error: None,
            },
            Err(e) => {
                warn!("Dry run could not read {} store: {}", name, e);
                Self {
                    copy: MemoryStore::new(),
                    unreadable: BTreeMap::new(),
                    read_error: Some(e.to_string()),
                }
            }
        }
    }

    fn readable(&self) -> PrefsResult<()> {
        match &self.read_error {
            Some(error) => Err(PrefsError::Other(error.clone())),
            None => Ok(()),
        }
    }
}

impl PreferenceStore for PreviewStore {
    fn get(&self, key: &str) -> PrefsResult<Option<PrefValue>> {
        self.readable()?;
        self.copy.get(key)
    }

    fn put(&mut self, key: &str, value: PrefValue) -> PrefsResult<()> {
        self.readable()?;
        self.unreadable.remove(key);
        self.copy.put(key, value)
    }

    fn remove(&mut self, key: &str) -> PrefsResult<Option<PrefValue>> {
        self.readable()?;
        self.unreadable.remove(key);
        self.copy.remove(key)
    }

    fn entries(&self) -> PrefsResult<Snapshot> {
        self.readable()?;
        self.copy.entries()
    }

    fn entries_lossy(&self) -> PrefsResult<LossySnapshot> {
        self.readable()?;
        Ok(LossySnapshot {
            entries: self.copy.entries()?,
            unreadable: self.unreadable.clone(),
        })
    }
}

/// Applies a [`RuleSet`] to the three settings stores.
///
/// # Examples
///
/// ```
/// use pref_migrator::databases::memory_store::MemoryStore;
/// use pref_migrator::migrator::PreferenceMigrator;
/// use pref_migrator::traits::store::PreferenceStore;
/// use pref_migrator::value::PrefValue;
///
/// let mut general = MemoryStore::from_pairs([
///     ("autosend_wifi", PrefValue::Bool(true)),
///     ("autosend_network", PrefValue::Bool(false)),
/// ]);
/// let mut admin = MemoryStore::new();
/// let mut meta = MemoryStore::new();
///
/// let migrator = PreferenceMigrator::collect();
/// migrator.migrate(&mut general, &mut admin, &mut meta);
///
/// assert_eq!(general.get("autosend").unwrap(), Some(PrefValue::from("wifi_only")));
/// assert!(!general.contains("autosend_wifi").unwrap());
///
/// // A second pass finds nothing to do.
/// let report = migrator.migrate(&mut general, &mut admin, &mut meta);
/// assert!(!report.has_changes());
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceMigrator {
    rules: RuleSet,
    options: MigrationOptions,
}

impl PreferenceMigrator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            options: MigrationOptions::default(),
        }
    }

    /// Migrator loaded with the built-in legacy settings rules.
    pub fn collect() -> Self {
        Self::new(collect::rules())
    }

    pub fn with_options(mut self, options: MigrationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    /// Run every rule once, in order, against the three stores.
    pub fn migrate(
        &self,
        general: &mut dyn PreferenceStore,
        admin: &mut dyn PreferenceStore,
        meta: &mut dyn PreferenceStore,
    ) -> MigrationReport {
        if self.options.dry_run {
            return self.preview(general, admin, meta);
        }

        let mut stores = StoreSet {
            general,
            admin,
            meta,
        };
        let report = self.run(&mut stores, false);

        if self.options.flush {
            for name in StoreName::iter() {
                if let Err(e) = stores.get(name).flush() {
                    warn!("Failed to flush {} store after migration: {}", name, e);
                }
            }
        }
        report
    }

    /// Apply the rules to in-memory copies so the real stores stay untouched.
    fn preview(
        &self,
        general: &dyn PreferenceStore,
        admin: &dyn PreferenceStore,
        meta: &dyn PreferenceStore,
    ) -> MigrationReport {
        let mut general = PreviewStore::of(StoreName::General, general);
        let mut admin = PreviewStore::of(StoreName::Admin, admin);
        let mut meta = PreviewStore::of(StoreName::Meta, meta);

        let mut stores = StoreSet {
            general: &mut general,
            admin: &mut admin,
            meta: &mut meta,
        };
        self.run(&mut stores, true)
    }

    fn run(&self, stores: &mut StoreSet<'_>, dry_run: bool) -> MigrationReport {
        let started = Instant::now();
        let mut report = MigrationReport {
            dry_run,
            rules: Vec::with_capacity(self.rules.len()),
        };

        for rule in &self.rules {
            let outcome = run_rule(rule, stores);
            match &outcome {
                RuleOutcome::Applied(changes) => {
                    info!("Migration rule '{}' applied {} change(s)", rule.name, changes.len());
                    for change in changes {
                        debug!("  {}", change);
                    }
                }
                RuleOutcome::Unchanged => {
                    debug!("Migration rule '{}' has nothing to do", rule.name)
                }
                RuleOutcome::Skipped(reason) => {
                    warn!("Migration rule '{}' skipped: {}", rule.name, reason)
                }
                RuleOutcome::Failed(error) => {
                    warn!("Migration rule '{}' failed: {}", rule.name, error)
                }
            }
            report.rules.push(RuleReport {
                rule: rule.name,
                store: rule.store,
                outcome,
            });
        }

        info!(
            "Preference migration{} finished in {:?}: {} rule(s) applied, clean: {}",
            if dry_run { " (dry run)" } else { "" },
            started.elapsed(),
            report.applied().count(),
            report.is_clean()
        );
        report
    }
}

fn run_rule(rule: &Rule, stores: &mut StoreSet<'_>) -> RuleOutcome {
    let read = match stores.get(rule.store).entries_lossy() {
        Ok(read) => read,
        Err(e) => return RuleOutcome::Failed(e.to_string()),
    };
    let unreadable = rule
        .migration
        .reads()
        .into_iter()
        .find_map(|key| read.unreadable.get_key_value(key));
    if let Some((key, reason)) = unreadable {
        return RuleOutcome::Failed(format!("cannot read {}: {}", key, reason));
    }

    match rule.migration.plan(rule.store, &read.entries) {
        Plan::Unchanged => RuleOutcome::Unchanged,
        Plan::Skip(reason) => RuleOutcome::Skipped(reason),
        Plan::Changes(changes) => match apply(&changes, stores) {
            Ok(()) => RuleOutcome::Applied(changes),
            Err(e) => RuleOutcome::Failed(e.to_string()),
        },
    }
}

fn apply(changes: &[Change], stores: &mut StoreSet<'_>) -> PrefsResult<()> {
    for change in changes {
        let store = stores.get(change.store);
        match &change.op {
            ChangeOp::Put { key, value } => store.put(key, value.clone())?,
            ChangeOp::Remove { key } => {
                store.remove(key)?;
            }
        }
    }
    Ok(())
}
