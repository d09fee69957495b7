//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Lowercases, strips URLs and punctuation, collapses whitespace
//! - **Tokenizer**: Splits normalized text into tokens, dropping digits and short tokens
//! - **Stopwords**: Removes tokens found in the run's stopword set
//! - **Ngram**: Joins contiguous tokens into bigrams / trigrams
//!
//! [`Analyzer`] composes the four into a single streaming pass.

pub mod ngram;
pub mod normalizer;
pub mod stopwords;
pub mod tokenizer;

pub use ngram::{ngrams, NgramWindow};
pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use stopwords::{parse_stopword_list, StopwordSet, DEFAULT_STOPWORDS};
pub use tokenizer::Tokenizer;

use frequently_types::{AnalyzerConfig, ConfigError, NgramSize, Term};
use rustc_hash::FxHashMap;

/// Per-document term frequencies.
///
/// Keys are normalized terms; values are strictly positive occurrence counts.
/// Iteration order carries no meaning.
pub type TermCounts = FxHashMap<Term, u32>;

/// Per-run analysis settings with the resolved stopword set.
///
/// Immutable once built and `Sync`, so one analyzer can count many documents
/// in parallel.
#[derive(Debug, Clone)]
pub struct Analyzer {
    normalizer: TextNormalizer,
    tokenizer: Tokenizer,
    stopwords: StopwordSet,
    ngram: NgramSize,
}

impl Analyzer {
    /// Creates an analyzer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MinTokenLen` if `min_token_len` is zero.
    pub fn new(config: AnalyzerConfig, stopwords: StopwordSet) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            normalizer: TextNormalizer::new(NormalizerConfig {
                keep_hyphens: config.keep_hyphens,
            }),
            tokenizer: Tokenizer::new(config.min_token_len),
            stopwords,
            ngram: config.ngram,
        })
    }

    /// Term granularity.
    pub fn ngram(&self) -> NgramSize {
        self.ngram
    }

    /// The stopword set in use.
    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Runs normalize -> tokenize -> stopword filter -> n-grams over `text`,
    /// emitting each term in order.
    ///
    /// `scratch` receives the normalized text and is reused across calls.
    pub fn analyze_into<F>(&self, text: &str, scratch: &mut String, mut emit: F)
    where
        F: FnMut(&str),
    {
        self.normalizer.normalize_into(text, scratch);

        let stopwords = &self.stopwords;
        let mut window = NgramWindow::new(self.ngram);
        self.tokenizer.tokenize(scratch, |token| {
            if stopwords.contains(token) {
                return;
            }
            if let Some(term) = window.push(token) {
                emit(term);
            }
        });
    }

    /// Collects every term of `text` in order.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let mut scratch = String::new();
        let mut out = Vec::new();
        self.analyze_into(text, &mut scratch, |term| out.push(term.to_owned()));
        out
    }

    /// Counts term occurrences in one document.
    ///
    /// Deterministic for identical text and configuration.
    pub fn count_terms(&self, text: &str) -> TermCounts {
        let mut scratch = String::with_capacity(text.len());
        let mut counts = TermCounts::default();
        self.analyze_into(text, &mut scratch, |term| {
            if let Some(count) = counts.get_mut(term) {
                *count += 1;
            } else {
                counts.insert(Term::from(term), 1);
            }
        });
        counts
    }
}
