//! Search filters declared by the downstream search engine.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A quantity attached to a search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuantityDecl {
    /// Canonical quantity name, as found in the QUANTITY namespace
    pub value: String,
    /// Base unit values of this filter are expressed in
    #[serde(default)]
    pub unit: Option<String>,
}

/// One declared search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchFilter {
    pub key: String,
    #[serde(default)]
    pub quantity: Option<QuantityDecl>,
}

impl SearchFilter {
    /// A filter with no quantity attached.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            quantity: None,
        }
    }

    /// A filter bound to a quantity, optionally with a unit.
    pub fn quantity(key: impl Into<String>, value: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            key: key.into(),
            quantity: Some(QuantityDecl {
                value: value.into(),
                unit: unit.map(str::to_string),
            }),
        }
    }
}

/// Filter a quantity name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityDescriptor {
    pub key: String,
    pub unit: Option<String>,
}

/// The declared search filters, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FilterModel {
    filters: Vec<SearchFilter>,
}

impl FilterModel {
    /// Create a model, rejecting duplicate filter keys.
    pub fn new(filters: Vec<SearchFilter>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(filters.len());
        for filter in &filters {
            if !seen.insert(filter.key.as_str()) {
                return Err(ConfigError::DuplicateFilter(filter.key.clone()));
            }
        }
        Ok(Self { filters })
    }

    /// All declared filters.
    pub fn filters(&self) -> &[SearchFilter] {
        &self.filters
    }

    /// Iterate over filters that carry a quantity.
    pub fn quantities(&self) -> impl Iterator<Item = (&str, &QuantityDecl)> {
        self.filters
            .iter()
            .filter_map(|f| f.quantity.as_ref().map(|q| (f.key.as_str(), q)))
    }

    /// Resolve a canonical quantity name to the first filter declaring it.
    pub fn resolve(&self, quantity: &str) -> Option<QuantityDescriptor> {
        self.quantities()
            .find(|(_, decl)| decl.value == quantity)
            .map(|(key, decl)| QuantityDescriptor {
                key: key.to_string(),
                unit: decl.unit.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn model() -> FilterModel {
        FilterModel::new(vec![
            SearchFilter::new("productType"),
            SearchFilter::quantity("cloudCover", "cloud", None),
            SearchFilter::quantity("altitude", "altitude", Some("m")),
            SearchFilter::quantity("altitudeMirror", "altitude", Some("km")),
        ])
        .unwrap()
    }

    #[rstest]
    #[case("cloud", Some(("cloudCover", None)))]
    #[case("altitude", Some(("altitude", Some("m"))))]
    #[case("productType", None)]
    #[case("snow", None)]
    fn test_resolve(#[case] quantity: &str, #[case] expected: Option<(&str, Option<&str>)>) {
        let resolved = model().resolve(quantity);
        let expected = expected.map(|(key, unit)| QuantityDescriptor {
            key: key.to_string(),
            unit: unit.map(str::to_string),
        });
        check!(resolved == expected);
    }

    #[test]
    fn test_quantities_skip_plain_filters() {
        let model = model();
        let keys: Vec<&str> = model.quantities().map(|(key, _)| key).collect();
        check!(keys == ["cloudCover", "altitude", "altitudeMirror"]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = FilterModel::new(vec![
            SearchFilter::new("cloudCover"),
            SearchFilter::quantity("cloudCover", "cloud", None),
        ]);
        check!(matches!(result, Err(ConfigError::DuplicateFilter(key)) if key == "cloudCover"));
    }
}
