//! Grammar of the "what" part of a search phrase.
//!
//! A phrase such as `altitude between 1 and 2 km without clouds` is handled one
//! construct at a time. Each construct processor receives the current token
//! list and the position of its trigger word, locates its operands with the
//! [extraction primitives](extract), and returns an [`Outcome`]: the span it
//! consumed, the tokens left over, the filter assignments it produced and any
//! diagnostics. Processors never fail; a construct that cannot be understood
//! is reported and its span is still consumed so the rest of the phrase can be
//! analyzed.

mod context;
pub mod extract;
pub mod temporal;
mod what;

pub use context::AnalysisContext;
pub use temporal::{TemporalProcessor, UnsupportedDates};
pub use what::{
    Comparison, process_between, process_equal, process_greater, process_lesser, process_with,
    process_without,
};

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Inclusive token range in the coordinates of the list a processor received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end }
    }

    /// Smallest span covering both.
    pub fn union(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Number of tokens covered.
    pub const fn width(self) -> usize {
        self.end - self.start + 1
    }
}

/// Value assigned to a search filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Exact value, rendered as the number itself.
    Scalar(f64),
    /// Strictly greater than the value, rendered `]v`.
    OpenLower(f64),
    /// Strictly lesser than the value, rendered `v[`.
    OpenUpper(f64),
    /// Inclusive interval, rendered `[a,b]`.
    ClosedRange(f64, f64),
    /// Presence (or absence) of a categorical keyword, rendered `kind:keyword`
    /// or `-kind:keyword`.
    KeywordFlag {
        kind: String,
        keyword: String,
        present: bool,
    },
}

impl FilterValue {
    /// Key under which a keyword flag is stored in a [`FilterMap`].
    pub fn keyword_key(kind: &str, keyword: &str) -> String {
        format!("{}:{}", kind, keyword)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{}", value),
            Self::OpenLower(value) => write!(f, "]{}", value),
            Self::OpenUpper(value) => write!(f, "{}[", value),
            Self::ClosedRange(from, to) => write!(f, "[{},{}]", from, to),
            Self::KeywordFlag {
                kind,
                keyword,
                present,
            } => {
                if !present {
                    f.write_str("-")?;
                }
                write!(f, "{}:{}", kind, keyword)
            }
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Filter assignments accumulated over one phrase. A later assignment to the
/// same key replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterMap(BTreeMap<String, FilterValue>);

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: FilterValue) -> Option<FilterValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assignments sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Why part of a phrase produced no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    /// No construct matched the operand window.
    NotUnderstood,
    /// The given unit disagrees with the unit the quantity is declared with.
    InvalidUnit,
    /// The quantity is declared with a unit but none was given.
    MissingUnit,
}

impl DiagnosticKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotUnderstood => "NOT_UNDERSTOOD",
            Self::InvalidUnit => "INVALID_UNIT",
            Self::MissingUnit => "MISSING_UNIT",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem attached to the words it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub fragment: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{}\"", self.kind, self.fragment)
    }
}

/// Result of one construct processor call.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Span removed from the input tokens.
    pub consumed: Span,
    /// Input tokens without the consumed span.
    pub tokens: Vec<String>,
    /// Assignments to apply, in order.
    pub assignments: Vec<(String, FilterValue)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Outcome {
    /// Remove `span` from `tokens`. A span running past the end is clamped.
    pub fn consume(tokens: &[String], span: Span) -> Self {
        let end = span.end.min(tokens.len().saturating_sub(1));
        let remaining = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < span.start || *i > end)
            .map(|(_, token)| token.clone())
            .collect();

        Self {
            consumed: Span::new(span.start, end.max(span.start)),
            tokens: remaining,
            assignments: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_assignment(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.assignments.push((key.into(), value));
        self
    }

    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}
