//! Unit normalization.

use serde::Serialize;

/// Conversions every dictionary understands without configuration:
/// (surface unit, base unit, factor).
pub(crate) const BUILTIN_CONVERSIONS: &[(&str, &str, f64)] = &[("km", "m", 1000.0)];

/// A unit expressed in its base unit, with the factor converting values to it.
///
/// e.g. `km` normalizes to `{ unit: "m", factor: 1000.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedUnit {
    pub unit: String,
    pub factor: f64,
}

impl NormalizedUnit {
    /// A unit that is already canonical.
    pub fn canonical(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            factor: 1.0,
        }
    }

    /// Conversions every dictionary understands without configuration.
    pub fn builtin(unit: &str) -> Self {
        BUILTIN_CONVERSIONS
            .iter()
            .find(|(surface, _, _)| *surface == unit)
            .map_or_else(
                || Self::canonical(unit),
                |(_, base, factor)| Self {
                    unit: (*base).to_string(),
                    factor: *factor,
                },
            )
    }

    /// Scale a value expressed in the surface unit into the base unit.
    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor
    }
}
