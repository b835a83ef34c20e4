//! TOML-backed dictionary.

use super::units::BUILTIN_CONVERSIONS;
use super::{Dictionary, Keyword, Modifier, Namespace, NormalizedUnit};
use crate::error::ConfigError;
use ahash::{AHashMap, AHashSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Plain decimal or scientific literal, optionally signed.
static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid numeric regex")
});

/// Word lists as written in the `[dictionary]` table of the configuration.
///
/// Every map goes from a canonical name to the surface forms that resolve to
/// it. The canonical name always resolves to itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordListConfig {
    pub stop_words: Vec<String>,
    /// Number words ("ten" = 10)
    pub numbers: BTreeMap<String, f64>,
    pub modifiers: BTreeMap<String, Vec<String>>,
    pub units: BTreeMap<String, Vec<String>>,
    pub quantities: BTreeMap<String, Vec<String>>,
    /// kind → keyword → surface forms
    pub keywords: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Surface unit → base unit conversion, on top of the built-in ones
    pub conversions: BTreeMap<String, ConversionConfig>,
}

/// Conversion of one unit into a base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    pub unit: String,
    pub factor: f64,
}

/// Dictionary built from a [`WordListConfig`], with reverse indexes for
/// constant-time phrase lookups.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    stop_words: AHashSet<String>,
    numbers: AHashMap<String, f64>,
    modifiers: AHashMap<String, String>,
    units: AHashMap<String, String>,
    quantities: AHashMap<String, String>,
    keywords: AHashMap<String, Keyword>,
    conversions: AHashMap<String, NormalizedUnit>,
}

impl WordList {
    /// Build the reverse indexes, validating modifier names and conversions.
    pub fn new(config: &WordListConfig) -> Result<Self, ConfigError> {
        for name in config.modifiers.keys() {
            if Modifier::from_name(name).is_none() {
                return Err(ConfigError::UnknownModifier(name.clone()));
            }
        }

        let mut conversions = AHashMap::with_capacity(config.conversions.len());
        for (surface, conversion) in &config.conversions {
            if !conversion.factor.is_finite() || conversion.factor <= 0.0 {
                return Err(ConfigError::InvalidFactor {
                    unit: surface.clone(),
                    factor: conversion.factor,
                });
            }
            conversions.insert(
                surface.clone(),
                NormalizedUnit {
                    unit: conversion.unit.clone(),
                    factor: conversion.factor,
                },
            );
        }

        let mut keywords = AHashMap::new();
        for (kind, entries) in &config.keywords {
            for (keyword, forms) in entries {
                let value = Keyword {
                    keyword: keyword.clone(),
                    kind: kind.clone(),
                };
                for form in std::iter::once(keyword).chain(forms) {
                    keywords.insert(form.to_lowercase(), value.clone());
                }
            }
        }

        let word_list = Self {
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            numbers: config
                .numbers
                .iter()
                .map(|(word, value)| (word.to_lowercase(), *value))
                .collect(),
            modifiers: reverse_index(&config.modifiers),
            units: reverse_index(&config.units),
            quantities: reverse_index(&config.quantities),
            keywords,
            conversions,
        };

        tracing::debug!(
            "Built word list: {} stop words, {} units, {} quantities, {} keyword forms",
            word_list.stop_words.len(),
            word_list.units.len(),
            word_list.quantities.len(),
            word_list.keywords.len()
        );

        Ok(word_list)
    }

    /// Whether `unit` is a base unit a filter may declare: either a unit of the
    /// word list or the target of a conversion.
    pub fn knows_unit(&self, unit: &str) -> bool {
        self.units.values().any(|u| u == unit)
            || self.conversions.values().any(|c| c.unit == unit)
            || BUILTIN_CONVERSIONS.iter().any(|(_, base, _)| *base == unit)
    }
}

/// Map every surface form (and the canonical name itself) to its canonical name.
fn reverse_index(entries: &BTreeMap<String, Vec<String>>) -> AHashMap<String, String> {
    let mut index = AHashMap::new();
    for (canonical, forms) in entries {
        for form in std::iter::once(canonical).chain(forms) {
            index.insert(form.to_lowercase(), canonical.clone());
        }
    }
    index
}

impl Dictionary for WordList {
    fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    fn get_number(&self, token: &str) -> Option<f64> {
        let value = if NUMERIC_LITERAL.is_match(token) {
            token.parse().ok()
        } else {
            self.numbers.get(token).copied()
        };
        value.filter(|v: &f64| v.is_finite())
    }

    fn get(&self, namespace: Namespace, phrase: &str) -> Option<&str> {
        let index = match namespace {
            Namespace::Unit => &self.units,
            Namespace::Quantity => &self.quantities,
            Namespace::Modifier => &self.modifiers,
        };
        index.get(phrase).map(String::as_str)
    }

    fn get_keyword(&self, phrase: &str) -> Option<Keyword> {
        self.keywords.get(phrase).cloned()
    }

    fn normalize_unit(&self, unit: &str) -> NormalizedUnit {
        self.conversions
            .get(unit)
            .cloned()
            .unwrap_or_else(|| NormalizedUnit::builtin(unit))
    }
}
