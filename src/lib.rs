//! # Pref Migrator
//!
//! Rule-driven migration of legacy application settings, run once at startup
//! before anything else reads them.
//!
//! Settings live in three key-value stores: `general`, `admin` and `meta`.
//! Older releases wrote keys and values that current releases no longer
//! understand. The [`PreferenceMigrator`](migrator::PreferenceMigrator) applies
//! an ordered [`RuleSet`](traits::migration::RuleSet) that rewrites them into
//! the current shape.
//!
//! ## Features
//!
//! - **Idempotent**: every rule only acts on legacy keys and removes them, so
//!   running the pass on every startup is safe
//! - **Never fails startup**: rules that meet data they cannot interpret are
//!   skipped, logged and reported instead of raising
//! - **Pure planning**: rules turn a store snapshot into a list of changes;
//!   the migrator alone touches the stores
//! - **Backends**: in-memory and sled-backed stores behind one trait
//!
//! ## Quick Start
//!
//! ```rust
//! use pref_migrator::prelude::*;
//!
//! let mut general = MemoryStore::from_pairs([
//!     ("map_sdk_behavior", PrefValue::from("osmdroid")),
//!     ("map_basemap_behavior", PrefValue::from("openmap_usgs_topo")),
//!     ("protocol", PrefValue::from("other_protocol")),
//! ]);
//! let mut admin = MemoryStore::from_pairs([("show_map_sdk", PrefValue::Bool(false))]);
//! let mut meta = MemoryStore::new();
//!
//! let report = PreferenceMigrator::collect().migrate(&mut general, &mut admin, &mut meta);
//! assert!(report.is_clean());
//!
//! assert_eq!(general.get("basemap_source")?, Some(PrefValue::from("usgs")));
//! assert_eq!(general.get("usgs_map_style")?, Some(PrefValue::from("topographic")));
//! assert_eq!(general.get("protocol")?, Some(PrefValue::from("odk_default")));
//! assert_eq!(admin.get("maps")?, Some(PrefValue::Bool(false)));
//! # Ok::<(), PrefsError>(())
//! ```

pub mod collect;
pub mod config;
pub mod databases;
pub mod error;
pub mod migrator;
pub mod prelude;
pub mod traits;
pub mod value;

pub use error::{PrefsError, PrefsResult};
