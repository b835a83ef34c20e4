//! Shared fixtures for integration tests.
//!
//! - `analyzer`: a [`QueryAnalyzer`] built from the built-in configuration
//! - [`TempConfigDir`]: a temporary directory for configuration files, removed
//!   when dropped

use query_analyzer::{AnalyzerConfig, QueryAnalyzer};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding configuration files.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempConfigDir {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempConfigDir {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `name` (parents created as needed) and returns the
    /// full path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(name);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", name, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", name, e));
        full_path
    }
}

impl Default for TempConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyzer over the built-in English configuration.
#[fixture]
pub fn analyzer() -> QueryAnalyzer {
    query_analyzer::tracing::init(false);
    let config = AnalyzerConfig::builtin().expect("built-in configuration parses");
    QueryAnalyzer::from_config(&config).expect("built-in configuration is valid")
}
