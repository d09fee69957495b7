//! Corpus aggregation and ranking.
//!
//! A [`Corpus`] maps each usable document to its term counts. From it,
//! [`CorpusStats`] derives document frequency, total counts and summed
//! smoothed TF-IDF per term, and the ranker orders terms by
//! `(docs_with_term, tfidf_sum, total_count)` descending, then by term.
//!
//! Everything here lives for one run; nothing is persisted.

mod api;
mod builder;
mod rank;
pub mod scoring;
mod stats;
mod types;

pub use api::{KeywordFinder, KeywordReport};
pub use builder::CorpusBuild;
pub use rank::rank_order;
pub use stats::{CorpusStats, TermStats};
pub use types::{Corpus, Document};
