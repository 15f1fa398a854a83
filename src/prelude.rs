//! Commonly used types, for glob import.

pub use crate::config::{MigrationOptions, SledConfig};
pub use crate::databases::MemoryStore;
#[cfg(feature = "sled")]
pub use crate::databases::{SledPreferenceDatabase, SledPreferences};
pub use crate::error::{PrefsError, PrefsResult};
pub use crate::migrator::{MigrationReport, PreferenceMigrator, RuleOutcome, RuleReport};
pub use crate::traits::migration::{
    Case, Change, ChangeOp, KeyInput, Migration, Pattern, Plan, Rule, RuleSet,
};
pub use crate::traits::store::{LossySnapshot, PreferenceStore, Snapshot, StoreName};
pub use crate::value::{PrefValue, ValueKind};
