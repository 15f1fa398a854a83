//! Rule-driven migration of legacy settings.
//!
//! # Architecture
//!
//! A [`Rule`] binds a [`Migration`] primitive to the store it reads. Planning
//! is a pure function from a store snapshot to a [`Plan`]; the
//! [`PreferenceMigrator`](crate::migrator::PreferenceMigrator) applies plans in
//! rule order, re-reading the store before each rule so later rules see the
//! effects of earlier ones.
//!
//! # Example
//!
//! ```
//! use pref_migrator::traits::migration::{Migration, Plan, Change};
//! use pref_migrator::traits::store::{Snapshot, StoreName};
//! use pref_migrator::value::PrefValue;
//!
//! let rule = Migration::move_key("scoped_storage_used", StoreName::Meta);
//!
//! let mut general = Snapshot::new();
//! general.insert("scoped_storage_used".into(), PrefValue::Bool(true));
//!
//! let plan = rule.plan(StoreName::General, &general);
//! assert_eq!(
//!     plan,
//!     Plan::Changes(vec![
//!         Change::put(StoreName::Meta, "scoped_storage_used", PrefValue::Bool(true)),
//!         Change::remove(StoreName::General, "scoped_storage_used"),
//!     ])
//! );
//!
//! // Once the key has moved there is nothing left to do.
//! assert_eq!(rule.plan(StoreName::General, &Snapshot::new()), Plan::Unchanged);
//! ```

mod change;
mod rule;

pub use change::*;
pub use rule::*;
