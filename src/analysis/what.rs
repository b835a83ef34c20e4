//! Construct processors for quantities and keywords.
//!
//! Supported constructs:
//!
//! - `<with|without> "quantity"` and `<with|without> "keyword"`
//! - `"quantity" <between> "numeric" <and> "numeric" ("unit")`
//! - `<between> "numeric" <and> "numeric" ("unit") (of) "quantity"`
//! - `"quantity" <equal|greater|lesser> (to) "numeric" "unit"`
//! - `<equal|greater|lesser> (to) "numeric" "unit" (of) "quantity"`

use super::extract::{QuantityMatch, extract_keyword, extract_quantity, extract_value_unit};
use super::{AnalysisContext, DiagnosticKind, FilterValue, Outcome, Span};
use crate::dictionary::{Modifier, Namespace};

/// How a comparison construct bounds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Greater,
    Lesser,
}

impl Comparison {
    fn bound(self, value: f64) -> FilterValue {
        match self {
            Self::Equal => FilterValue::Scalar(value),
            Self::Greater => FilterValue::OpenLower(value),
            Self::Lesser => FilterValue::OpenUpper(value),
        }
    }
}

/// `<with> "quantity"` requires the quantity to be above zero;
/// `<with> "keyword"` requires the keyword.
pub fn process_with(context: &AnalysisContext<'_>, tokens: &[String], position: usize) -> Outcome {
    with_or_without(context, tokens, position, true)
}

/// `<without> "quantity"` requires the quantity to be zero;
/// `<without> "keyword"` excludes the keyword.
pub fn process_without(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    position: usize,
) -> Outcome {
    with_or_without(context, tokens, position, false)
}

fn with_or_without(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    position: usize,
    with: bool,
) -> Outcome {
    let end = context.end_position(tokens, position + 1);
    let clause = Span::new(position, end);

    if tokens.get(position + 1).is_none() {
        return context.reject(DiagnosticKind::NotUnderstood, tokens, clause);
    }

    if let Some(quantity) = extract_quantity(context, tokens, position + 1, end, false) {
        let value = if with {
            FilterValue::OpenLower(0.0)
        } else {
            FilterValue::Scalar(0.0)
        };
        return Outcome::consume(tokens, Span::new(position, quantity.span.end))
            .with_assignment(quantity.key, value);
    }

    if let Some(keyword) = extract_keyword(context, tokens, position + 1, end, false) {
        let key = FilterValue::keyword_key(&keyword.kind, &keyword.keyword);
        let flag = FilterValue::KeywordFlag {
            kind: keyword.kind,
            keyword: keyword.keyword,
            present: with,
        };
        return Outcome::consume(tokens, clause).with_assignment(key, flag);
    }

    context.reject(DiagnosticKind::NotUnderstood, tokens, clause)
}

/// `<between> "numeric" <and> "numeric" ("unit")` around a quantity.
///
/// Anything else after `between` (a missing connective, non-numeric operands)
/// is a date range and goes to the context's
/// [`TemporalProcessor`](super::TemporalProcessor).
pub fn process_between(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    position: usize,
) -> Outcome {
    let dictionary = context.dictionary();

    let connective = tokens
        .get(position + 2)
        .and_then(|word| context.modifier(word));
    if tokens.get(position + 3).is_none() || connective != Some(Modifier::And) {
        return context
            .temporal()
            .process_between(context, tokens, position);
    }

    let (Some(from), Some(to)) = (
        dictionary.get_number(&tokens[position + 1]),
        dictionary.get_number(&tokens[position + 3]),
    ) else {
        return context
            .temporal()
            .process_between(context, tokens, position);
    };

    let unit = tokens
        .get(position + 4)
        .and_then(|word| dictionary.get(Namespace::Unit, word))
        .map(|unit| dictionary.normalize_unit(unit));
    let operands = Span::new(position, position + if unit.is_some() { 4 } else { 3 });

    let Some(quantity) = locate_quantity(context, tokens, position, operands.end + 1) else {
        let end = context
            .end_position(tokens, operands.end + 1)
            .max(operands.end);
        return context.reject(
            DiagnosticKind::NotUnderstood,
            tokens,
            Span::new(position, end),
        );
    };
    let span = operands.union(quantity.span);

    match unit {
        Some(unit) if quantity.unit.as_deref() == Some(unit.unit.as_str()) => {
            let (from, to) = (unit.apply(from), unit.apply(to));
            if !from.is_finite() || !to.is_finite() {
                return context.reject(DiagnosticKind::NotUnderstood, tokens, span);
            }
            Outcome::consume(tokens, span)
                .with_assignment(quantity.key, FilterValue::ClosedRange(from, to))
        }
        Some(_) => context.reject(DiagnosticKind::InvalidUnit, tokens, span),
        None if quantity.unit.is_some() => {
            context.reject(DiagnosticKind::MissingUnit, tokens, span)
        }
        None => Outcome::consume(tokens, span)
            .with_assignment(quantity.key, FilterValue::ClosedRange(from, to)),
    }
}

/// `<equal> (to) "numeric" "unit"` around a quantity.
pub fn process_equal(context: &AnalysisContext<'_>, tokens: &[String], position: usize) -> Outcome {
    compare(context, tokens, position, Comparison::Equal)
}

/// `<greater> (than) "numeric" "unit"` around a quantity.
pub fn process_greater(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    position: usize,
) -> Outcome {
    compare(context, tokens, position, Comparison::Greater)
}

/// `<lesser> (than) "numeric" "unit"` around a quantity.
pub fn process_lesser(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    position: usize,
) -> Outcome {
    compare(context, tokens, position, Comparison::Lesser)
}

fn compare(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    position: usize,
    comparison: Comparison,
) -> Outcome {
    let end = context.end_position(tokens, position + 1);

    let Some(valued) = extract_value_unit(context, tokens, position + 1, end) else {
        return context.reject(
            DiagnosticKind::NotUnderstood,
            tokens,
            Span::new(position, end),
        );
    };
    let operands = Span::new(position, valued.span.end);

    let Some(quantity) = locate_quantity(context, tokens, position, valued.span.end + 1) else {
        return context.reject(DiagnosticKind::NotUnderstood, tokens, operands);
    };
    let span = operands.union(quantity.span);

    if quantity.unit.as_deref() != Some(valued.unit.unit.as_str()) {
        return context.reject(DiagnosticKind::InvalidUnit, tokens, span);
    }

    let value = valued.unit.apply(valued.value);
    if !value.is_finite() {
        return context.reject(DiagnosticKind::NotUnderstood, tokens, span);
    }
    Outcome::consume(tokens, span).with_assignment(quantity.key, comparison.bound(value))
}

/// The quantity a construct applies to: the one written just before the
/// trigger, else the first one after the operands.
fn locate_quantity(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    trigger: usize,
    after: usize,
) -> Option<QuantityMatch> {
    trigger
        .checked_sub(1)
        .and_then(|end| extract_quantity(context, tokens, 0, end, true))
        .or_else(|| {
            extract_quantity(
                context,
                tokens,
                after,
                tokens.len().saturating_sub(1),
                false,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UnsupportedDates;
    use crate::dictionary::{WordList, WordListConfig};
    use crate::model::{FilterModel, SearchFilter};
    use assert2::check;
    use rstest::{fixture, rstest};

    fn words(phrase: &str) -> Vec<String> {
        phrase.split_whitespace().map(str::to_string).collect()
    }

    struct Setup {
        dictionary: WordList,
        model: FilterModel,
    }

    impl Setup {
        fn context(&self) -> AnalysisContext<'_> {
            AnalysisContext::new(&self.dictionary, &self.model, &UnsupportedDates)
        }
    }

    #[fixture]
    fn setup() -> Setup {
        let config: WordListConfig = toml::from_str(
            r#"
stop_words = ["the", "of", "to", "than"]
modifiers = { with = [], without = [], between = [], and = [], equal = [], greater = [], lesser = [] }
units = { m = ["meters"], km = ["kilometers"], "%" = ["percent"] }
quantities = { cloud = ["cloudcover", "cloud cover"], altitude = [] }

[keywords.landuse]
forest = []
"#,
        )
        .unwrap();
        Setup {
            dictionary: WordList::new(&config).unwrap(),
            model: FilterModel::new(vec![
                SearchFilter::quantity("cloudCover", "cloud", None),
                SearchFilter::quantity("altitude", "altitude", Some("m")),
            ])
            .unwrap(),
        }
    }

    /// Run `processor` on the first occurrence of `trigger` in `phrase`.
    fn run(
        setup: &Setup,
        processor: fn(&AnalysisContext<'_>, &[String], usize) -> Outcome,
        phrase: &str,
        trigger: &str,
    ) -> Outcome {
        let tokens = words(phrase);
        let position = tokens.iter().position(|t| t == trigger).unwrap();
        processor(&setup.context(), &tokens, position)
    }

    fn rendered(outcome: &Outcome) -> Vec<(String, String)> {
        outcome
            .assignments
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    fn assigned(key: &str, value: &str) -> Vec<(String, String)> {
        vec![(key.to_string(), value.to_string())]
    }

    #[rstest]
    fn test_with_quantity(setup: Setup) {
        let outcome = run(&setup, process_with, "with cloudcover", "with");
        check!(rendered(&outcome) == assigned("cloudCover", "]0"));
        check!(outcome.tokens.is_empty());
        check!(outcome.diagnostics.is_empty());
    }

    #[rstest]
    fn test_without_quantity(setup: Setup) {
        let outcome = run(&setup, process_without, "images without cloudcover", "without");
        check!(rendered(&outcome) == assigned("cloudCover", "0"));
        check!(outcome.tokens == ["images"]);
    }

    #[rstest]
    fn test_with_quantity_stops_at_match(setup: Setup) {
        let outcome = run(&setup, process_with, "with cloudcover images", "with");
        check!(outcome.consumed == Span::new(0, 1));
        check!(outcome.tokens == ["images"]);
    }

    #[rstest]
    #[case(process_with, "landuse:forest")]
    #[case(process_without, "-landuse:forest")]
    fn test_keyword_flags(
        setup: Setup,
        #[case] processor: fn(&AnalysisContext<'_>, &[String], usize) -> Outcome,
        #[case] expected: &str,
    ) {
        let outcome = run(&setup, processor, "w forest", "w");
        check!(outcome.tokens.is_empty());
        check!(rendered(&outcome) == assigned("landuse:forest", expected));
    }

    #[rstest]
    #[case("with")]
    #[case("with and")]
    #[case("with nothing known")]
    fn test_with_not_understood(setup: Setup, #[case] phrase: &str) {
        let outcome = run(&setup, process_with, phrase, "with");
        check!(outcome.assignments.is_empty());
        check!(outcome.diagnostics.len() == 1);
        check!(outcome.diagnostics[0].kind == DiagnosticKind::NotUnderstood);
        check!(outcome.consumed.start == 0);
    }

    #[rstest]
    #[case("between 10 and 20 meters altitude", "[10,20]")]
    #[case("between 10 and 20 km altitude", "[10000,20000]")]
    #[case("altitude between 10 and 20 km", "[10000,20000]")]
    #[case("altitude of the between 1 and 2 m", "[1,2]")]
    #[case("between 10 and 20 m of altitude", "[10,20]")]
    fn test_between_with_unit(setup: Setup, #[case] phrase: &str, #[case] expected: &str) {
        let outcome = run(&setup, process_between, phrase, "between");
        check!(outcome.diagnostics.is_empty());
        check!(rendered(&outcome) == assigned("altitude", expected));
        check!(outcome.tokens.is_empty());
    }

    #[rstest]
    fn test_between_without_unit(setup: Setup) {
        let outcome = run(&setup, process_between, "between 10 and 20 cloudcover", "between");
        check!(rendered(&outcome) == assigned("cloudCover", "[10,20]"));
        check!(outcome.tokens.is_empty());
    }

    #[rstest]
    fn test_between_keeps_unrelated_words(setup: Setup) {
        let outcome = run(&setup, process_between, "altitude between 1 and 2 km forest", "between");
        check!(rendered(&outcome) == assigned("altitude", "[1000,2000]"));
        check!(outcome.tokens == ["forest"]);
    }

    #[rstest]
    #[case("between 10 and 20 km cloudcover", DiagnosticKind::InvalidUnit)]
    #[case("between 10 and 20 altitude", DiagnosticKind::MissingUnit)]
    #[case("between 10 and 20 km", DiagnosticKind::NotUnderstood)]
    fn test_between_errors(setup: Setup, #[case] phrase: &str, #[case] kind: DiagnosticKind) {
        let outcome = run(&setup, process_between, phrase, "between");
        check!(outcome.assignments.is_empty());
        check!(outcome.diagnostics.len() == 1);
        check!(outcome.diagnostics[0].kind == kind);
        check!(outcome.tokens.is_empty());
    }

    #[rstest]
    #[case("between june and july")]
    #[case("between 10 or 20 km altitude")]
    #[case("between 10 and")]
    fn test_between_defers_to_temporal(setup: Setup, #[case] phrase: &str) {
        let outcome = run(&setup, process_between, phrase, "between");
        check!(outcome.assignments.is_empty());
        check!(outcome.diagnostics[0].kind == DiagnosticKind::NotUnderstood);
        check!(outcome.consumed.start == 0);
    }

    #[rstest]
    #[case(process_equal, "altitude equal to 5 km", "5000")]
    #[case(process_greater, "altitude greater than 500 m", "]500")]
    #[case(process_lesser, "lesser than 2 km of altitude", "2000[")]
    #[case(process_greater, "greater than 1.5 kilometers altitude", "]1500")]
    fn test_comparisons(
        setup: Setup,
        #[case] processor: fn(&AnalysisContext<'_>, &[String], usize) -> Outcome,
        #[case] phrase: &str,
        #[case] expected: &str,
    ) {
        let tokens = words(phrase);
        let position = tokens
            .iter()
            .position(|t| matches!(t.as_str(), "equal" | "greater" | "lesser"))
            .unwrap();
        let outcome = processor(&setup.context(), &tokens, position);
        check!(outcome.diagnostics.is_empty());
        check!(rendered(&outcome) == assigned("altitude", expected));
        check!(outcome.tokens.is_empty());
    }

    #[rstest]
    fn test_equal_invalid_unit(setup: Setup) {
        let outcome = run(&setup, process_equal, "equal to 50 percent cloudcover", "equal");
        check!(outcome.assignments.is_empty());
        check!(outcome.diagnostics.len() == 1);
        check!(outcome.diagnostics[0].kind == DiagnosticKind::InvalidUnit);
        check!(outcome.diagnostics[0].fragment == "equal to 50 percent cloudcover");
        check!(outcome.tokens.is_empty());
    }

    #[rstest]
    fn test_greater_unknown_quantity(setup: Setup) {
        let outcome = run(&setup, process_greater, "greater than 5 quantity", "greater");
        check!(outcome.assignments.is_empty());
        check!(outcome.diagnostics[0].kind == DiagnosticKind::NotUnderstood);
        check!(outcome.diagnostics[0].fragment == "greater than 5 quantity");
    }

    #[rstest]
    #[case(process_between, "altitude between 1 and 1e306 km")]
    #[case(process_greater, "altitude greater than 1e306 km")]
    fn test_overflowing_values_rejected(
        setup: Setup,
        #[case] processor: fn(&AnalysisContext<'_>, &[String], usize) -> Outcome,
        #[case] phrase: &str,
    ) {
        let tokens = words(phrase);
        let outcome = processor(&setup.context(), &tokens, 1);
        check!(outcome.assignments.is_empty());
        check!(outcome.diagnostics.len() == 1);
        check!(outcome.diagnostics[0].kind == DiagnosticKind::NotUnderstood);
        check!(outcome.tokens.is_empty());
    }

    #[rstest]
    fn test_greater_with_unit_but_no_quantity(setup: Setup) {
        let outcome = run(&setup, process_greater, "greater than 5 km trees", "greater");
        check!(outcome.diagnostics[0].kind == DiagnosticKind::NotUnderstood);
        check!(outcome.consumed == Span::new(0, 3));
        check!(outcome.tokens == ["trees"]);
    }
}
