//! Orchestration of construct processors over a whole phrase.

use crate::analysis::{
    AnalysisContext, Diagnostic, FilterMap, Outcome, TemporalProcessor, UnsupportedDates,
    process_between, process_equal, process_greater, process_lesser, process_with,
    process_without,
};
use crate::config::AnalyzerConfig;
use crate::dictionary::{Dictionary, Modifier};
use crate::error::ConfigError;
use crate::model::FilterModel;
use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Default bound on the number of constructs processed per phrase.
pub const DEFAULT_MAX_CONSTRUCTS: usize = 64;

/// Signature shared by every construct processor.
pub type Processor = fn(&AnalysisContext<'_>, &[String], usize) -> Outcome;

/// Result of analyzing one phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Tokens as received, joined by spaces
    pub query: String,
    pub filters: FilterMap,
    pub diagnostics: Vec<Diagnostic>,
    /// Tokens no construct consumed, in their original order
    pub remaining: Vec<String>,
}

impl Analysis {
    /// Whether every construct in the phrase was understood.
    pub fn is_understood(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Turns tokenized search phrases into filter assignments.
///
/// Cheap to share: the dictionary, filter model and temporal processor live
/// behind `Arc`s, and [`analyze`](Self::analyze) keeps all per-phrase state on
/// its own stack.
#[derive(Clone)]
pub struct QueryAnalyzer {
    dictionary: Arc<dyn Dictionary>,
    model: Arc<FilterModel>,
    temporal: Arc<dyn TemporalProcessor>,
    max_constructs: usize,
}

impl Debug for QueryAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryAnalyzer")
            .field("filters", &self.model.filters().len())
            .field("max_constructs", &self.max_constructs)
            .finish_non_exhaustive()
    }
}

impl QueryAnalyzer {
    /// Create an analyzer without date support.
    pub fn new(dictionary: Arc<dyn Dictionary>, model: Arc<FilterModel>) -> Self {
        Self {
            dictionary,
            model,
            temporal: Arc::new(UnsupportedDates),
            max_constructs: DEFAULT_MAX_CONSTRUCTS,
        }
    }

    /// Build an analyzer from a validated configuration.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let (word_list, model) = config.build()?;
        Ok(Self::new(Arc::new(word_list), Arc::new(model))
            .with_max_constructs(config.analyzer.max_constructs))
    }

    /// Hand `between` constructs with non-numeric operands to `temporal`.
    #[must_use]
    pub fn with_temporal(mut self, temporal: Arc<dyn TemporalProcessor>) -> Self {
        self.temporal = temporal;
        self
    }

    /// Stop after `max_constructs` constructs (at least one).
    #[must_use]
    pub fn with_max_constructs(mut self, max_constructs: usize) -> Self {
        self.max_constructs = max_constructs.max(1);
        self
    }

    pub fn dictionary(&self) -> &dyn Dictionary {
        self.dictionary.as_ref()
    }

    pub fn model(&self) -> &FilterModel {
        &self.model
    }

    fn context(&self) -> AnalysisContext<'_> {
        AnalysisContext::new(
            self.dictionary.as_ref(),
            &self.model,
            self.temporal.as_ref(),
        )
    }

    /// Processor for a trigger modifier. `and` starts no construct.
    pub fn processor(modifier: Modifier) -> Option<Processor> {
        match modifier {
            Modifier::With => Some(process_with),
            Modifier::Without => Some(process_without),
            Modifier::Between => Some(process_between),
            Modifier::Equal => Some(process_equal),
            Modifier::Greater => Some(process_greater),
            Modifier::Lesser => Some(process_lesser),
            Modifier::And => None,
        }
    }

    /// First trigger word in `tokens` and its processor.
    fn next_trigger(
        context: &AnalysisContext<'_>,
        tokens: &[String],
    ) -> Option<(usize, Modifier, Processor)> {
        tokens.iter().enumerate().find_map(|(position, token)| {
            let modifier = context.modifier(token)?;
            Self::processor(modifier).map(|processor| (position, modifier, processor))
        })
    }

    /// Analyze a token list.
    ///
    /// Constructs are processed left to right, each one removing the tokens it
    /// consumed before the next trigger is searched for. A later assignment to
    /// the same filter replaces the earlier one.
    pub fn analyze(&self, tokens: Vec<String>) -> Analysis {
        let query = tokens.join(" ");
        let context = self.context();

        let mut tokens = tokens;
        let mut filters = FilterMap::new();
        let mut diagnostics = Vec::new();
        let mut processed = 0;

        while let Some((position, modifier, processor)) = Self::next_trigger(&context, &tokens) {
            if processed == self.max_constructs {
                tracing::warn!(
                    "Stopped after {} constructs in \"{}\", {} tokens left",
                    processed,
                    query,
                    tokens.len()
                );
                break;
            }
            processed += 1;

            let outcome = processor(&context, &tokens, position);
            debug_assert!(outcome.tokens.len() < tokens.len());
            tracing::debug!(
                "Processed '{}' at {}: consumed {:?}, {} assignments, {} diagnostics",
                modifier,
                position,
                outcome.consumed,
                outcome.assignments.len(),
                outcome.diagnostics.len()
            );

            for (key, value) in outcome.assignments {
                filters.insert(key, value);
            }
            diagnostics.extend(outcome.diagnostics);
            tokens = outcome.tokens;
        }

        Analysis {
            query,
            filters,
            diagnostics,
            remaining: tokens,
        }
    }

    /// Split `phrase` on whitespace, lowercase it and [`analyze`](Self::analyze) it.
    pub fn analyze_phrase(&self, phrase: &str) -> Analysis {
        self.analyze(tokenize(phrase))
    }
}

/// Whitespace tokenization with lowercasing.
pub fn tokenize(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_lowercase).collect()
}
