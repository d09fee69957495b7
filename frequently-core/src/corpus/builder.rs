//! Corpus building logic.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::analyzer::{Analyzer, TermCounts};
use crate::corpus::types::{Corpus, Document};

/// Result of building a corpus from extracted documents.
#[derive(Debug, Clone, Default)]
pub struct CorpusBuild {
    /// Documents that yielded text.
    pub corpus: Corpus,
    /// Names of documents left out because their text was empty, in input order.
    pub excluded: Vec<String>,
}

impl Corpus {
    /// Counts terms for every document and collects the usable ones.
    ///
    /// Per-document counting runs in parallel; results are merged in input
    /// order, so when two documents share a name the later one wins.
    pub fn from_documents(analyzer: &Analyzer, documents: &[Document]) -> CorpusBuild {
        let counted: Vec<Option<TermCounts>> = documents
            .par_iter()
            .map(|doc| {
                if doc.is_blank() {
                    None
                } else {
                    Some(analyzer.count_terms(&doc.text))
                }
            })
            .collect();

        let mut build = CorpusBuild::default();
        for (doc, counts) in documents.iter().zip(counted) {
            match counts {
                None => {
                    debug!(document = %doc.name, "no extractable text, excluded");
                    build.excluded.push(doc.name.clone());
                }
                Some(counts) => {
                    debug!(
                        document = %doc.name,
                        distinct_terms = counts.len(),
                        "counted terms"
                    );
                    if build.corpus.insert(doc.name.clone(), counts).is_some() {
                        warn!(document = %doc.name, "duplicate document name, keeping the last one");
                    }
                }
            }
        }
        build
    }
}
