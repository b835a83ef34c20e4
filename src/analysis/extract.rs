//! Windowed phrase scanning.
//!
//! Extraction grows a candidate phrase one word at a time from the edge of a
//! window nearest the trigger, looking the phrase up after every step. The
//! first phrase that resolves wins, so the shortest match next to the trigger
//! is preferred. Stop-words are left out of the phrase but still count in
//! position bookkeeping, so returned spans cover them.

use super::{AnalysisContext, Span};
use crate::dictionary::{Namespace, NormalizedUnit};

/// A quantity found in the token list and the filter it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityMatch {
    pub span: Span,
    pub key: String,
    pub unit: Option<String>,
}

/// A categorical keyword found in the token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub span: Span,
    pub keyword: String,
    pub kind: String,
}

/// A `number unit` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedUnit {
    pub value: f64,
    pub unit: NormalizedUnit,
    /// From the number to the unit word
    pub span: Span,
}

/// Grow a phrase over `[start, end]` and return the first lookup hit.
///
/// Forward scans append words, reverse scans prepend them, so the phrase reads
/// in sentence order either way. `joiner` goes between words.
fn scan<T>(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    (start, end): (usize, usize),
    reverse: bool,
    joiner: &str,
    mut lookup: impl FnMut(&str) -> Option<T>,
) -> Option<(Span, T)> {
    if start > end || start >= tokens.len() {
        return None;
    }
    let end = end.min(tokens.len() - 1);

    let mut phrase = String::new();
    for (i, word) in AnalysisContext::slice(tokens, start, end - start + 1, reverse)
        .into_iter()
        .enumerate()
    {
        if context.dictionary().is_stop_word(word) {
            continue;
        }

        phrase = match (phrase.is_empty(), reverse) {
            (true, _) => word.to_string(),
            (false, true) => format!("{}{}{}", word, joiner, phrase),
            (false, false) => format!("{}{}{}", phrase, joiner, word),
        };

        if let Some(found) = lookup(&phrase) {
            let span = if reverse {
                Span::new(end - i, end)
            } else {
                Span::new(start, start + i)
            };
            return Some((span, found));
        }
    }
    None
}

/// Find a quantity declared in the filter model within `[start, end]`.
///
/// Quantity names the dictionary knows but no filter declares are skipped and
/// scanning goes on.
pub fn extract_quantity(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    start: usize,
    end: usize,
    reverse: bool,
) -> Option<QuantityMatch> {
    let (span, descriptor) = scan(context, tokens, (start, end), reverse, " ", |phrase| {
        context
            .dictionary()
            .get(Namespace::Quantity, phrase)
            .and_then(|quantity| context.model().resolve(quantity))
    })?;

    tracing::trace!("Quantity '{}' at {:?}", descriptor.key, span);
    Some(QuantityMatch {
        span,
        key: descriptor.key,
        unit: descriptor.unit,
    })
}

/// Find a categorical keyword within `[start, end]`.
///
/// Words are joined with `-` when scanning in reverse and with a space
/// otherwise: compound keywords are registered in both forms.
pub fn extract_keyword(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    start: usize,
    end: usize,
    reverse: bool,
) -> Option<KeywordMatch> {
    let joiner = if reverse { "-" } else { " " };
    let (span, keyword) = scan(context, tokens, (start, end), reverse, joiner, |phrase| {
        context.dictionary().get_keyword(phrase)
    })?;

    tracing::trace!("Keyword '{}:{}' at {:?}", keyword.kind, keyword.keyword, span);
    Some(KeywordMatch {
        span,
        keyword: keyword.keyword,
        kind: keyword.kind,
    })
}

/// Find the first `number unit` pair in `[start, end]`, skipping stop-words.
///
/// The number must sit before `end` so that its unit fits in the window.
pub fn extract_value_unit(
    context: &AnalysisContext<'_>,
    tokens: &[String],
    start: usize,
    end: usize,
) -> Option<ValuedUnit> {
    let dictionary = context.dictionary();
    let end = end.min(tokens.len().saturating_sub(1));

    (start..end).find_map(|i| {
        let word = &tokens[i];
        if dictionary.is_stop_word(word) {
            return None;
        }
        let value = dictionary.get_number(word)?;
        let unit = dictionary.get(Namespace::Unit, &tokens[i + 1])?;
        Some(ValuedUnit {
            value,
            unit: dictionary.normalize_unit(unit),
            span: Span::new(i, i + 1),
        })
    })
}
