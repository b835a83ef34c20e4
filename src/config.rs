//! Analyzer configuration: word lists, declared filters and analysis bounds.
//!
//! Configuration is read from the first of:
//!
//! 1. an explicit path (`--config`)
//! 2. `$QUERY_ANALYZER_CONFIG`
//! 3. `<config dir>/query-analyzer/config.toml`
//! 4. the built-in English configuration

use crate::analyzer::DEFAULT_MAX_CONSTRUCTS;
use crate::dictionary::{WordList, WordListConfig};
use crate::error::ConfigError;
use crate::model::{FilterModel, SearchFilter};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "QUERY_ANALYZER_CONFIG";

const BUILTIN_CONFIG: &str = include_str!("../config/default.toml");

/// Complete analyzer configuration as read from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub analyzer: AnalyzerSettings,
    pub dictionary: WordListConfig,
    pub filters: Vec<SearchFilter>,
}

/// The `[analyzer]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerSettings {
    /// Constructs processed per phrase before analysis stops
    pub max_constructs: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_constructs: DEFAULT_MAX_CONSTRUCTS,
        }
    }
}

/// Where a configuration was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Environment(PathBuf),
    UserConfig(PathBuf),
    Builtin,
}

impl ConfigSource {
    /// File backing this source, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Environment(path) | Self::UserConfig(path) => Some(path),
            Self::Builtin => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Environment(path) => write!(f, "{} (from ${})", path.display(), CONFIG_ENV),
            Self::UserConfig(path) => write!(f, "{} (user config)", path.display()),
            Self::Builtin => f.write_str("built-in configuration"),
        }
    }
}

impl AnalyzerConfig {
    /// The built-in English configuration.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(BUILTIN_CONFIG)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse the file at `path`. A leading `~` is expanded.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path = expand_tilde(path);
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    /// Load the configuration from the first available source.
    ///
    /// An explicit or environment path that cannot be read is an error; a
    /// missing user config file falls through to the built-in configuration.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let source = resolve_source(
            explicit,
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            dirs::config_dir(),
        );
        let config = match source.path() {
            Some(path) => Self::load(path)?,
            None => Self::builtin()?,
        };
        tracing::debug!("Using {}", source);
        Ok((config, source))
    }

    /// Build the word list and filter model, checking that they agree.
    pub fn build(&self) -> Result<(WordList, FilterModel), ConfigError> {
        if self.analyzer.max_constructs == 0 {
            return Err(ConfigError::ZeroConstructBound);
        }

        let word_list = WordList::new(&self.dictionary)?;
        for filter in &self.filters {
            if let Some(unit) = filter.quantity.as_ref().and_then(|q| q.unit.as_deref())
                && !word_list.knows_unit(unit)
            {
                return Err(ConfigError::UnknownUnit {
                    filter: filter.key.clone(),
                    unit: unit.to_string(),
                });
            }
        }

        let model = FilterModel::new(self.filters.clone())?;
        Ok((word_list, model))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build().map(|_| ())
    }
}

/// Pick the configuration source without touching the filesystem beyond an
/// existence check of the user config file.
fn resolve_source(
    explicit: Option<&Path>,
    environment: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(path) = environment.filter(|p| !p.as_os_str().is_empty()) {
        return ConfigSource::Environment(path);
    }
    config_dir
        .map(|dir| dir.join("query-analyzer").join("config.toml"))
        .filter(|path| path.is_file())
        .map_or(ConfigSource::Builtin, ConfigSource::UserConfig)
}

/// Expand a leading `~` component to the user's home directory.
///
/// - `~/rules/en.toml` becomes `/home/user/rules/en.toml`
/// - `~` becomes `/home/user`
/// - `~user/x` and other paths are returned unchanged
pub fn expand_tilde(path: &Path) -> Cow<'_, Path> {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) if rest.as_os_str().is_empty() => Cow::Owned(home),
        (Ok(rest), Some(home)) => Cow::Owned(home.join(rest)),
        _ => Cow::Borrowed(path),
    }
}
