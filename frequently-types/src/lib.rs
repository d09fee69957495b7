//! Core types shared across the Frequently crates.
//!
//! This crate holds the value types that cross crate boundaries:
//!
//! - **Terms**: case-normalized unigram / n-gram keys
//! - **Configuration**: analyzer and ranking options, validated up front
//! - **Rows**: ranked terms and the exported keyword table rows
//! - **Errors**: configuration and corpus failures

#![warn(missing_docs)]

use core::fmt;
use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Minimum number of usable documents required to rank terms.
///
/// Ranking is driven by document frequency, so a single document has no
/// overlap to measure.
pub const MIN_CORPUS_DOCUMENTS: usize = 2;

/// A candidate keyword.
///
/// Either a single token or `n` contiguous tokens joined by one ASCII space.
/// Keys are always produced by the normalizer, so they only contain
/// `[a-z0-9-]` and single spaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    /// Creates a term from an already-normalized string.
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the term text.
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of space-joined tokens in this term.
    pub fn arity(&self) -> usize {
        self.0.split(' ').filter(|t| !t.is_empty()).count()
    }

    /// Consumes the term and returns the owned text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for Term {
    #[inline(always)]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Term granularity.
///
/// Serialized as the plain integer `1`, `2` or `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum NgramSize {
    /// Single tokens.
    #[default]
    Unigram = 1,
    /// Two contiguous tokens.
    Bigram = 2,
    /// Three contiguous tokens.
    Trigram = 3,
}

impl NgramSize {
    /// Window length in tokens.
    #[inline(always)]
    pub const fn len(self) -> usize {
        self as usize
    }

    /// Human readable label, as shown in the keyword-type selector.
    pub const fn label(self) -> &'static str {
        match self {
            NgramSize::Unigram => "Unigrams",
            NgramSize::Bigram => "Bigrams",
            NgramSize::Trigram => "Trigrams",
        }
    }
}

impl TryFrom<u8> for NgramSize {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NgramSize::Unigram),
            2 => Ok(NgramSize::Bigram),
            3 => Ok(NgramSize::Trigram),
            other => Err(ConfigError::UnsupportedNgram(other)),
        }
    }
}

impl From<NgramSize> for u8 {
    fn from(value: NgramSize) -> Self {
        value as u8
    }
}

impl fmt::Display for NgramSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Options for turning one document's text into term counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Term granularity.
    pub ngram: NgramSize,
    /// Minimum characters per token; shorter tokens are dropped.
    pub min_token_len: usize,
    /// Keep `-` inside tokens so `cage-free` stays one token.
    pub keep_hyphens: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ngram: NgramSize::Unigram,
            min_token_len: 3,
            keep_hyphens: true,
        }
    }
}

impl AnalyzerConfig {
    /// Checks option ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_token_len == 0 {
            return Err(ConfigError::MinTokenLen);
        }
        Ok(())
    }
}

/// Options for filtering and truncating the ranked term list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Minimum number of documents a term must appear in.
    pub min_docs: u32,
    /// Maximum number of rows returned.
    pub top_k: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            min_docs: 2,
            top_k: 50,
        }
    }
}

impl RankConfig {
    /// Checks option ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_docs == 0 {
            return Err(ConfigError::MinDocs);
        }
        if self.top_k == 0 {
            return Err(ConfigError::TopK);
        }
        Ok(())
    }

    /// Returns a copy with `min_docs` clamped to the corpus size.
    ///
    /// Asking for more documents than exist would always yield an empty table.
    #[must_use]
    pub fn clamped_to(self, num_documents: usize) -> Self {
        let cap = u32::try_from(num_documents).unwrap_or(u32::MAX).max(1);
        Self {
            min_docs: self.min_docs.min(cap),
            ..self
        }
    }
}

/// A term that passed the document-frequency threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    /// The term.
    pub term: Term,
    /// Number of documents containing the term (>= 1).
    pub docs_with_term: u32,
    /// Occurrences summed over all documents (>= 1).
    pub total_count: u64,
    /// Smoothed TF-IDF summed over all documents (>= 0).
    pub tfidf_sum: f64,
}

/// One row of the exported keyword table.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRow {
    /// The term.
    pub term: Term,
    /// Number of documents containing the term.
    pub docs_with_term: u32,
    /// Percentage of the corpus containing the term, one decimal place.
    #[serde(rename = "coverage_%")]
    pub coverage_pct: f64,
    /// Occurrences summed over all documents.
    pub total_count: u64,
    /// Smoothed TF-IDF summed over all documents.
    pub tfidf_sum: f64,
}

impl KeywordRow {
    /// Builds the table row for `row` in a corpus of `num_documents`.
    pub fn from_ranked(row: RankedRow, num_documents: usize) -> Self {
        Self {
            coverage_pct: coverage_pct(row.docs_with_term, num_documents),
            term: row.term,
            docs_with_term: row.docs_with_term,
            total_count: row.total_count,
            tfidf_sum: row.tfidf_sum,
        }
    }
}

/// `round(100 * docs_with_term / num_documents, 1)`.
///
/// Rounds the decimal expansion of the binary value, exact ties to even, so
/// `12.25` becomes `12.2` and `33.333…` becomes `33.3`.
pub fn coverage_pct(docs_with_term: u32, num_documents: usize) -> f64 {
    if num_documents == 0 {
        return 0.0;
    }
    let raw = 100.0 * f64::from(docs_with_term) / num_documents as f64;
    format!("{raw:.1}").parse().unwrap_or(raw)
}

/// Invalid analyzer or ranking options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Only unigrams, bigrams and trigrams are supported.
    #[error("unsupported n-gram size {0} (expected 1, 2 or 3)")]
    UnsupportedNgram(u8),
    /// `min_token_len` was zero.
    #[error("minimum token length must be at least 1")]
    MinTokenLen,
    /// `min_docs` was zero.
    #[error("minimum document count must be at least 1")]
    MinDocs,
    /// `top_k` was zero.
    #[error("top_k must be at least 1")]
    TopK,
}

/// Failures when ranking a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CorpusError {
    /// Too few documents with extractable text to measure overlap.
    #[error("insufficient corpus: {usable} usable document(s), need at least {required}")]
    Insufficient {
        /// Documents that yielded text.
        usable: usize,
        /// Minimum needed.
        required: usize,
    },
    /// Ranking options were invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
