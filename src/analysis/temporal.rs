//! Hand-off point for date constructs.
//!
//! `between` is ambiguous: `between 10 and 20 km` is a quantity range while
//! `between june and july` is a date range. Numeric operands are handled by
//! [`process_between`](super::process_between); everything else is passed to a
//! [`TemporalProcessor`].

use super::{AnalysisContext, DiagnosticKind, Outcome, Span};
use crate::dictionary::Modifier;

/// Processor for `between` constructs whose operands are not numbers.
pub trait TemporalProcessor: Send + Sync {
    /// Handle the `between` at `position`. Must consume at least the trigger.
    fn process_between(
        &self,
        context: &AnalysisContext<'_>,
        tokens: &[String],
        position: usize,
    ) -> Outcome;
}

/// Default processor for analyzers without date support: reports the
/// construct as not understood.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedDates;

impl TemporalProcessor for UnsupportedDates {
    fn process_between(
        &self,
        context: &AnalysisContext<'_>,
        tokens: &[String],
        position: usize,
    ) -> Outcome {
        // `between x and y`: keep the connective and second operand together
        let has_connective = tokens.get(position + 3).is_some()
            && tokens
                .get(position + 2)
                .and_then(|w| context.modifier(w))
                .is_some_and(|m| m == Modifier::And);

        let end = if has_connective {
            position + 3
        } else {
            context.end_position(tokens, position + 1)
        };

        tracing::debug!("No date support for 'between' at {}", position);
        context.reject(DiagnosticKind::NotUnderstood, tokens, Span::new(position, end))
    }
}
