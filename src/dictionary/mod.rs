//! Vocabulary lookups used by the analyzer.
//!
//! The analyzer never hardcodes words: stop-words, numbers, units, quantity
//! names, grammatical modifiers and categorical keywords all come from a
//! [`Dictionary`]. [`WordList`] is the TOML-backed implementation shipped with
//! the crate; any other implementation of the trait can be plugged in.

mod units;
mod word_list;

pub use units::NormalizedUnit;
pub use word_list::{ConversionConfig, WordList, WordListConfig};

use std::fmt;

/// Lookup namespaces that resolve a surface phrase to a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Physical units ("meters" → "m").
    Unit,
    /// Quantity names ("cloud cover" → "cloud").
    Quantity,
    /// Grammatical modifiers ("above" → "greater").
    Modifier,
}

/// A grammatical modifier recognized in the MODIFIER namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    With,
    Without,
    Between,
    /// Connective used by `between … and …`; bounds clauses but triggers nothing.
    And,
    Equal,
    Greater,
    Lesser,
}

impl Modifier {
    /// All modifiers, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::With,
        Self::Without,
        Self::Between,
        Self::And,
        Self::Equal,
        Self::Greater,
        Self::Lesser,
    ];

    /// Canonical name as stored in the dictionary.
    pub const fn name(self) -> &'static str {
        match self {
            Self::With => "with",
            Self::Without => "without",
            Self::Between => "between",
            Self::And => "and",
            Self::Equal => "equal",
            Self::Greater => "greater",
            Self::Lesser => "lesser",
        }
    }

    /// Parse a canonical modifier name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Whether this modifier starts a construct of its own.
    pub const fn is_trigger(self) -> bool {
        !matches!(self, Self::And)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A categorical keyword and the kind it belongs to (e.g. `landuse:forest`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub keyword: String,
    pub kind: String,
}

/// Read-only vocabulary consulted during analysis.
///
/// Implementations must be safe to share between threads: one dictionary
/// serves every query analyzed by a [`QueryAnalyzer`](crate::QueryAnalyzer).
pub trait Dictionary: Send + Sync {
    /// Whether `token` carries no meaning for phrase reconstruction.
    fn is_stop_word(&self, token: &str) -> bool;

    /// Parse a numeric literal or a number word.
    fn get_number(&self, token: &str) -> Option<f64>;

    /// Resolve `phrase` to its canonical name within `namespace`.
    fn get(&self, namespace: Namespace, phrase: &str) -> Option<&str>;

    /// Resolve `phrase` to a categorical keyword.
    fn get_keyword(&self, phrase: &str) -> Option<Keyword>;

    /// Convert a canonical unit to its base unit and scaling factor.
    fn normalize_unit(&self, unit: &str) -> NormalizedUnit {
        NormalizedUnit::builtin(unit)
    }

    /// Resolve `token` to a grammatical modifier.
    fn modifier(&self, token: &str) -> Option<Modifier> {
        self.get(Namespace::Modifier, token)
            .and_then(Modifier::from_name)
    }
}
