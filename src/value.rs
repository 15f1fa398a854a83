//! Typed preference values.
//!
//! Every store maps string keys to a [`PrefValue`]. The set of variants mirrors
//! what a settings file can hold: booleans, strings, 64 and 32 bit integers,
//! floats and sets of strings.
//!
//! Values written by older releases sometimes carry invisible formatting
//! characters (a trailing left-to-right mark is the usual offender), so any
//! comparison made by a migration rule goes through [`PrefValue::normalized`].

use derive_more::From;
use std::collections::BTreeSet;
use std::fmt;
use strum::EnumDiscriminants;

/// Characters that never carry meaning in a stored setting value.
const FORMATTING_CHARS: &[char] = &[
    '\u{200B}', // zero width space
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{202A}',
    '\u{202B}',
    '\u{202C}',
    '\u{202D}',
    '\u{202E}',
    '\u{FEFF}', // byte order mark
];

/// A single stored preference value.
///
/// # Examples
///
/// ```
/// use pref_migrator::value::PrefValue;
///
/// let value = PrefValue::from("terrain\u{200e}");
/// assert_eq!(value.normalized(), PrefValue::from("terrain"));
/// assert!(!value.is_canonical());
///
/// assert_eq!(PrefValue::from(true).as_bool(), Some(true));
/// assert_eq!(PrefValue::from(1i64).as_bool(), None);
/// ```
#[derive(Debug, Clone, PartialEq, From, EnumDiscriminants, bincode::Encode, bincode::Decode)]
#[strum_discriminants(name(ValueKind), derive(strum::Display, strum::AsRefStr))]
pub enum PrefValue {
    Bool(bool),
    String(String),
    Long(i64),
    Int(i32),
    Float(f32),
    StringSet(BTreeSet<String>),
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::String(value.to_string())
    }
}

impl PrefValue {
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            PrefValue::Long(v) => Some(*v),
            PrefValue::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            PrefValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PrefValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            PrefValue::StringSet(set) => Some(set),
            _ => None,
        }
    }

    /// Canonical form used for every comparison a rule makes.
    ///
    /// Strings lose formatting characters and surrounding whitespace, string
    /// sets have each member normalised the same way. Other variants are
    /// returned unchanged.
    pub fn normalized(&self) -> PrefValue {
        match self {
            PrefValue::String(s) => PrefValue::String(normalize_str(s)),
            PrefValue::StringSet(set) => {
                PrefValue::StringSet(set.iter().map(|s| normalize_str(s)).collect())
            }
            other => other.clone(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.normalized() == *self
    }
}

/// Strip formatting characters and trim whitespace.
pub fn normalize_str(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORMATTING_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::String(s) => write!(f, "{:?}", s),
            PrefValue::Long(v) => write!(f, "{}L", v),
            PrefValue::Int(v) => write!(f, "{}", v),
            PrefValue::Float(v) => write!(f, "{}f", v),
            PrefValue::StringSet(set) => {
                let members: Vec<_> = set.iter().map(|s| format!("{:?}", s)).collect();
                write!(f, "{{{}}}", members.join(", "))
            }
        }
    }
}
