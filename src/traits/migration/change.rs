//! The writes and deletions a rule asks the migrator to perform.

use crate::traits::store::StoreName;
use crate::value::PrefValue;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    Put { key: String, value: PrefValue },
    Remove { key: String },
}

/// One mutation of one store.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub store: StoreName,
    pub op: ChangeOp,
}

impl Change {
    pub fn put(store: StoreName, key: impl Into<String>, value: PrefValue) -> Self {
        Self {
            store,
            op: ChangeOp::Put {
                key: key.into(),
                value,
            },
        }
    }

    pub fn remove(store: StoreName, key: impl Into<String>) -> Self {
        Self {
            store,
            op: ChangeOp::Remove { key: key.into() },
        }
    }

    pub fn key(&self) -> &str {
        match &self.op {
            ChangeOp::Put { key, .. } | ChangeOp::Remove { key } => key,
        }
    }

    pub fn is_put(&self) -> bool {
        matches!(self.op, ChangeOp::Put { .. })
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            ChangeOp::Put { key, value } => write!(f, "{}: {} = {}", self.store, key, value),
            ChangeOp::Remove { key } => write!(f, "{}: remove {}", self.store, key),
        }
    }
}

/// What a rule decided after looking at its store.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Nothing to migrate; the store is already in the current shape.
    Unchanged,
    /// Writes first, then deletions.
    Changes(Vec<Change>),
    /// The legacy data could not be interpreted; leave it alone.
    Skip(String),
}

impl Plan {
    /// Build a plan, ordering puts ahead of removals.
    ///
    /// An interrupted move then leaves the key in both stores rather than in
    /// neither, and re-running the rule finishes the job.
    pub fn from_changes(mut changes: Vec<Change>) -> Self {
        if changes.is_empty() {
            return Plan::Unchanged;
        }
        changes.sort_by_key(|c| !c.is_put());
        Plan::Changes(changes)
    }
}
