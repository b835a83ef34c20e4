pub mod analysis;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod model;
pub mod tracing;

pub use analysis::{Diagnostic, DiagnosticKind, FilterMap, FilterValue, Outcome, Span};
pub use analyzer::{Analysis, QueryAnalyzer, tokenize};
pub use config::{AnalyzerConfig, ConfigSource};
pub use dictionary::{Dictionary, Keyword, Modifier, Namespace, WordList};
pub use error::{ConfigError, Result};
pub use model::{FilterModel, SearchFilter};
