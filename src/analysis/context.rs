//! Request-scoped context threaded through every extraction and processor call.

use super::temporal::TemporalProcessor;
use super::{Diagnostic, DiagnosticKind, Outcome, Span};
use crate::dictionary::{Dictionary, Modifier};
use crate::model::FilterModel;
use std::fmt::{self, Debug, Formatter};

/// Collaborators a construct processor consults.
///
/// Borrowed from the [`QueryAnalyzer`](crate::QueryAnalyzer) for the duration
/// of one phrase; holds no per-phrase state of its own.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    dictionary: &'a dyn Dictionary,
    model: &'a FilterModel,
    temporal: &'a dyn TemporalProcessor,
}

impl Debug for AnalysisContext<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("filters", &self.model.filters().len())
            .finish_non_exhaustive()
    }
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        dictionary: &'a dyn Dictionary,
        model: &'a FilterModel,
        temporal: &'a dyn TemporalProcessor,
    ) -> Self {
        Self {
            dictionary,
            model,
            temporal,
        }
    }

    pub fn dictionary(&self) -> &'a dyn Dictionary {
        self.dictionary
    }

    pub fn model(&self) -> &'a FilterModel {
        self.model
    }

    pub fn temporal(&self) -> &'a dyn TemporalProcessor {
        self.temporal
    }

    /// Modifier `token` stands for, if any.
    pub fn modifier(&self, token: &str) -> Option<Modifier> {
        self.dictionary.modifier(token)
    }

    /// Last index of the clause starting at `from`.
    ///
    /// A clause runs until the word before the next modifier, or to the end of
    /// the list. The result is never below `from - 1` as long as
    /// `from <= tokens.len()`, so `[from - 1, end]` is always a valid span.
    pub fn end_position(&self, tokens: &[String], from: usize) -> usize {
        tokens
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, token)| self.modifier(token).is_some())
            .map_or_else(|| tokens.len().saturating_sub(1), |(i, _)| i.saturating_sub(1))
    }

    /// Up to `len` words from `start`, reversed on demand.
    pub fn slice(tokens: &[String], start: usize, len: usize, reverse: bool) -> Vec<&str> {
        let start = start.min(tokens.len());
        let end = start.saturating_add(len).min(tokens.len());
        let mut words: Vec<&str> = tokens[start..end].iter().map(String::as_str).collect();
        if reverse {
            words.reverse();
        }
        words
    }

    /// Words of `[start, end]` joined back into a sentence fragment.
    pub fn to_sentence(tokens: &[String], start: usize, end: usize) -> String {
        if start > end {
            return String::new();
        }
        Self::slice(tokens, start, end - start + 1, false).join(" ")
    }

    /// Build a diagnostic for the words of `span`.
    pub fn diagnostic(&self, kind: DiagnosticKind, tokens: &[String], span: Span) -> Diagnostic {
        let fragment = Self::to_sentence(tokens, span.start, span.end);
        tracing::debug!("{} on \"{}\"", kind, fragment);
        Diagnostic { kind, fragment }
    }

    /// Consume `span` and report it with `kind`, producing no assignment.
    pub fn reject(&self, kind: DiagnosticKind, tokens: &[String], span: Span) -> Outcome {
        Outcome::consume(tokens, span).with_diagnostic(self.diagnostic(kind, tokens, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UnsupportedDates;
    use crate::dictionary::{WordList, WordListConfig};
    use assert2::check;
    use rstest::rstest;

    fn words(phrase: &str) -> Vec<String> {
        phrase.split_whitespace().map(str::to_string).collect()
    }

    fn word_list() -> WordList {
        let mut config = WordListConfig::default();
        config
            .modifiers
            .insert("with".to_string(), vec!["containing".to_string()]);
        config.modifiers.insert("and".to_string(), vec![]);
        WordList::new(&config).unwrap()
    }

    #[rstest]
    #[case("with forest and water", 1, 1)]
    #[case("with forest containing water", 1, 1)]
    #[case("with forest", 1, 1)]
    #[case("with", 1, 0)]
    #[case("with with forest", 1, 0)]
    #[case("snow and ice cover", 3, 3)]
    fn test_end_position(#[case] phrase: &str, #[case] from: usize, #[case] expected: usize) {
        let dictionary = word_list();
        let model = FilterModel::default();
        let context = AnalysisContext::new(&dictionary, &model, &UnsupportedDates);
        check!(context.end_position(&words(phrase), from) == expected);
    }

    #[rstest]
    #[case(0, 2, false, &["a", "b"])]
    #[case(1, 3, true, &["d", "c", "b"])]
    #[case(2, 10, false, &["c", "d"])]
    #[case(9, 1, false, &[])]
    fn test_slice(
        #[case] start: usize,
        #[case] len: usize,
        #[case] reverse: bool,
        #[case] expected: &[&str],
    ) {
        let tokens = words("a b c d");
        check!(AnalysisContext::slice(&tokens, start, len, reverse) == expected);
    }

    #[test]
    fn test_to_sentence() {
        let tokens = words("greater than 5 km");
        check!(AnalysisContext::to_sentence(&tokens, 1, 3) == "than 5 km");
        check!(AnalysisContext::to_sentence(&tokens, 2, 1).is_empty());
        check!(AnalysisContext::to_sentence(&tokens, 3, 8) == "km");
    }
}
