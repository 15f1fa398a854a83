//! Migration primitives and the rules built from them.
//!
//! A [`Migration`] is a tagged transform over a snapshot of one store. Planning
//! is pure: [`Migration::plan`] only looks at the snapshot it is handed and
//! returns the [`Change`]s it wants. Each primitive only acts while its legacy
//! keys are present and removes them when it does, so a second pass over the
//! same data plans nothing.

use super::change::{Change, Plan};
use crate::traits::store::{Snapshot, StoreName};
use crate::value::PrefValue;
use log::debug;

/// Matches one input of a [`Case`].
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// The (normalised) value equals this one.
    Is(PrefValue),
    /// Anything, including an absent key with no default.
    Any,
}

impl Pattern {
    pub fn is(value: impl Into<PrefValue>) -> Self {
        Pattern::Is(value.into())
    }

    fn matches(&self, value: Option<&PrefValue>) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Is(expected) => value == Some(expected),
        }
    }
}

/// A key read by [`Migration::CombineKeys`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
    pub key: String,
    /// Value assumed when the key is absent.
    pub default: Option<PrefValue>,
}

impl KeyInput {
    pub fn optional(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default: None,
        }
    }

    pub fn with_default(key: impl Into<String>, default: impl Into<PrefValue>) -> Self {
        Self {
            key: key.into(),
            default: Some(default.into()),
        }
    }
}

/// One row of a [`Migration::CombineKeys`] table.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub when: Vec<Pattern>,
    pub then: Vec<(String, PrefValue)>,
}

impl Case {
    pub fn when(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self {
            when: patterns.into_iter().collect(),
            then: Vec::new(),
        }
    }

    pub fn then<K, I>(mut self, outputs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PrefValue)>,
    {
        self.then = outputs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }
}

/// A single idempotent transform applied to one store.
#[derive(Debug, Clone, PartialEq)]
pub enum Migration {
    /// Move a value to a new key in the same store.
    RenameKey { from: String, to: String },

    /// Rewrite `from` into `to` when its value is listed; other values pass
    /// through untouched.
    TranslateKey {
        from: String,
        to: String,
        values: Vec<(PrefValue, PrefValue)>,
    },

    /// Replace a value outside `allowed` with `fallback`.
    RestrictValues {
        key: String,
        allowed: Vec<PrefValue>,
        fallback: PrefValue,
    },

    /// Read several keys, pick the first matching case, write its outputs and
    /// drop the inputs.
    CombineKeys { inputs: Vec<KeyInput>, cases: Vec<Case> },

    /// Relocate a key, value preserved, into another store.
    MoveKey { key: String, to: StoreName },

    /// Delete keys outright.
    RemoveKeys { keys: Vec<String> },
}

impl Migration {
    pub fn rename_key(from: impl Into<String>, to: impl Into<String>) -> Self {
        Migration::RenameKey {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn translate_key<I>(from: impl Into<String>, to: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (PrefValue, PrefValue)>,
    {
        Migration::TranslateKey {
            from: from.into(),
            to: to.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn restrict_values<I>(key: impl Into<String>, allowed: I, fallback: PrefValue) -> Self
    where
        I: IntoIterator<Item = PrefValue>,
    {
        Migration::RestrictValues {
            key: key.into(),
            allowed: allowed.into_iter().collect(),
            fallback,
        }
    }

    pub fn combine_keys(
        inputs: impl IntoIterator<Item = KeyInput>,
        cases: impl IntoIterator<Item = Case>,
    ) -> Self {
        Migration::CombineKeys {
            inputs: inputs.into_iter().collect(),
            cases: cases.into_iter().collect(),
        }
    }

    pub fn move_key(key: impl Into<String>, to: StoreName) -> Self {
        Migration::MoveKey {
            key: key.into(),
            to,
        }
    }

    pub fn remove_keys<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Migration::RemoveKeys {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Keys of the home store whose values this transform looks at.
    pub fn reads(&self) -> Vec<&str> {
        match self {
            Migration::RenameKey { from, .. } | Migration::TranslateKey { from, .. } => {
                vec![from.as_str()]
            }
            Migration::RestrictValues { key, .. } | Migration::MoveKey { key, .. } => {
                vec![key.as_str()]
            }
            Migration::CombineKeys { inputs, .. } => {
                inputs.iter().map(|input| input.key.as_str()).collect()
            }
            Migration::RemoveKeys { keys } => keys.iter().map(String::as_str).collect(),
        }
    }

    /// Decide what this transform would do to `snapshot`, the current content
    /// of the `home` store.
    pub fn plan(&self, home: StoreName, snapshot: &Snapshot) -> Plan {
        match self {
            Migration::RenameKey { from, to } => {
                let Some(value) = snapshot.get(from) else {
                    return Plan::Unchanged;
                };
                if from == to {
                    return Plan::Unchanged;
                }
                Plan::from_changes(vec![
                    Change::put(home, to, value.clone()),
                    Change::remove(home, from),
                ])
            }

            Migration::TranslateKey { from, to, values } => {
                let Some(current) = snapshot.get(from) else {
                    return Plan::Unchanged;
                };
                let current = current.normalized();
                let Some((_, new_value)) = values.iter().find(|(old, _)| *old == current) else {
                    debug!("{} = {} has no translation, leaving it", from, current);
                    return Plan::Unchanged;
                };
                let mut changes = vec![Change::put(home, to, new_value.clone())];
                if from != to {
                    changes.push(Change::remove(home, from));
                }
                Plan::from_changes(changes)
            }

            Migration::RestrictValues {
                key,
                allowed,
                fallback,
            } => {
                let Some(raw) = snapshot.get(key) else {
                    return Plan::Unchanged;
                };
                if raw.kind() != fallback.kind() {
                    return Plan::Skip(format!(
                        "{} holds a {} where a {} was expected",
                        key,
                        raw.kind(),
                        fallback.kind()
                    ));
                }
                let current = raw.normalized();
                if allowed.contains(&current) {
                    if current == *raw {
                        Plan::Unchanged
                    } else {
                        Plan::from_changes(vec![Change::put(home, key, current)])
                    }
                } else if *raw == *fallback {
                    Plan::Unchanged
                } else {
                    Plan::from_changes(vec![Change::put(home, key, fallback.clone())])
                }
            }

            Migration::CombineKeys { inputs, cases } => plan_combine(home, snapshot, inputs, cases),

            Migration::MoveKey { key, to } => {
                let Some(value) = snapshot.get(key) else {
                    return Plan::Unchanged;
                };
                if *to == home {
                    return Plan::Unchanged;
                }
                Plan::from_changes(vec![
                    Change::put(*to, key, value.clone()),
                    Change::remove(home, key),
                ])
            }

            Migration::RemoveKeys { keys } => Plan::from_changes(
                keys.iter()
                    .filter(|key| snapshot.contains_key(*key))
                    .map(|key| Change::remove(home, key))
                    .collect(),
            ),
        }
    }
}

fn plan_combine(home: StoreName, snapshot: &Snapshot, inputs: &[KeyInput], cases: &[Case]) -> Plan {
    if inputs.iter().all(|input| !snapshot.contains_key(&input.key)) {
        return Plan::Unchanged;
    }

    let resolved: Vec<Option<PrefValue>> = inputs
        .iter()
        .map(|input| {
            snapshot
                .get(&input.key)
                .map(PrefValue::normalized)
                .or_else(|| input.default.clone())
        })
        .collect();

    let matched = cases.iter().find(|case| {
        case.when.len() == resolved.len()
            && case
                .when
                .iter()
                .zip(&resolved)
                .all(|(pattern, value)| pattern.matches(value.as_ref()))
    });

    let Some(case) = matched else {
        let described: Vec<String> = inputs
            .iter()
            .zip(&resolved)
            .map(|(input, value)| match value {
                Some(v) => format!("{}={}", input.key, v),
                None => format!("{}=<absent>", input.key),
            })
            .collect();
        return Plan::Skip(format!("no mapping for {}", described.join(", ")));
    };

    let mut changes: Vec<Change> = case
        .then
        .iter()
        .map(|(key, value)| Change::put(home, key, value.clone()))
        .collect();
    changes.extend(
        inputs
            .iter()
            .filter(|input| snapshot.contains_key(&input.key))
            .filter(|input| !case.then.iter().any(|(key, _)| *key == input.key))
            .map(|input| Change::remove(home, &input.key)),
    );
    Plan::from_changes(changes)
}

/// A named [`Migration`] bound to the store it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: &'static str,
    pub store: StoreName,
    pub migration: Migration,
}

impl Rule {
    pub fn new(name: &'static str, store: StoreName, migration: Migration) -> Self {
        Self {
            name,
            store,
            migration,
        }
    }
}

/// Rules in the order they run. Later rules see what earlier ones wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
