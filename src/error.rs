//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for query-analyzer operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the command-line front-end.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading or validating analyzer configuration fails.
///
/// Analysis itself never fails: problems with a phrase are reported as
/// [`Diagnostic`](crate::analysis::Diagnostic)s. These errors only concern the
/// word lists and filter declarations the analyzer is built from.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read configuration at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A unit conversion declares a factor that cannot scale values.
    #[error("Unit conversion '{unit}' has invalid factor {factor} (must be finite and > 0)")]
    InvalidFactor { unit: String, factor: f64 },

    /// A modifier entry uses a name the grammar does not know.
    #[error("Unknown modifier '{0}' (expected one of with, without, between, and, equal, greater, lesser)")]
    UnknownModifier(String),

    /// A filter quantity refers to a unit missing from the unit word list.
    #[error("Filter '{filter}' declares unknown unit '{unit}'")]
    UnknownUnit { filter: String, unit: String },

    /// The same filter key is declared more than once.
    #[error("Filter '{0}' is declared more than once")]
    DuplicateFilter(String),

    /// The construct bound would stop analysis before it starts.
    #[error("max_constructs must be at least 1")]
    ZeroConstructBound,
}
