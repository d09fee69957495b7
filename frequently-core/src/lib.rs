//! Cross-document keyword ranking.
//!
//! The pipeline turns raw document text into a ranked keyword table:
//!
//! 1. [`analyzer`]: normalize, tokenize, drop stopwords, build n-grams, count
//! 2. [`corpus`]: document frequency, summed smoothed TF-IDF, ranking
//! 3. [`export`]: CSV, JSON and the query shortlist
//!
//! Everything is in memory and scoped to one run.

pub mod analyzer;
pub mod corpus;
pub mod export;

pub use analyzer::{Analyzer, StopwordSet, TermCounts};
pub use corpus::{Corpus, CorpusStats, Document, KeywordFinder, KeywordReport};
