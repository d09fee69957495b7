//! Corpus statistics: document frequency, total counts and summed TF-IDF.

use frequently_types::Term;
use rustc_hash::FxHashMap;

use crate::corpus::scoring::tfidf;
use crate::corpus::types::Corpus;

/// Aggregates for one term across the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TermStats {
    /// Number of documents containing the term.
    pub document_frequency: u32,
    /// Occurrences summed over all documents.
    pub total_count: u64,
    /// TF-IDF contributions summed over all documents.
    pub tfidf_sum: f64,
}

/// Derived statistics for a corpus, recomputed on every run.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    /// Number of documents in the corpus (`N`).
    pub num_documents: usize,
    pub(crate) terms: FxHashMap<Term, TermStats>,
}

impl CorpusStats {
    /// Computes document frequency, total counts and summed TF-IDF.
    ///
    /// Two passes: document frequencies must be complete before any IDF can
    /// be evaluated. The corpus is not modified.
    pub fn compute(corpus: &Corpus) -> Self {
        let num_documents = corpus.len();
        let mut terms: FxHashMap<Term, TermStats> = FxHashMap::default();

        for counts in corpus.documents.values() {
            for (term, &count) in counts {
                if let Some(stats) = terms.get_mut(term) {
                    stats.document_frequency += 1;
                    stats.total_count += u64::from(count);
                } else {
                    terms.insert(
                        term.clone(),
                        TermStats {
                            document_frequency: 1,
                            total_count: u64::from(count),
                            tfidf_sum: 0.0,
                        },
                    );
                }
            }
        }

        for counts in corpus.documents.values() {
            let doc_total: u64 = counts.values().map(|&c| u64::from(c)).sum();
            for (term, &count) in counts {
                if let Some(stats) = terms.get_mut(term) {
                    stats.tfidf_sum +=
                        tfidf(count, doc_total, num_documents, stats.document_frequency);
                }
            }
        }

        Self {
            num_documents,
            terms,
        }
    }

    /// Number of distinct terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Aggregates for `term`.
    pub fn get(&self, term: &str) -> Option<&TermStats> {
        self.terms.get(term)
    }

    /// Number of documents containing `term` (0 if absent).
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.get(term).map_or(0, |s| s.document_frequency)
    }

    /// Summed TF-IDF of `term` (0 if absent).
    pub fn tfidf_sum(&self, term: &str) -> f64 {
        self.get(term).map_or(0.0, |s| s.tfidf_sum)
    }

    /// Occurrences of `term` over all documents (0 if absent).
    pub fn total_count(&self, term: &str) -> u64 {
        self.get(term).map_or(0, |s| s.total_count)
    }

    /// Iterates all terms in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, &TermStats)> {
        self.terms.iter()
    }

    /// Total term occurrences in the corpus.
    pub fn total_occurrences(&self) -> u64 {
        self.terms.values().map(|s| s.total_count).sum()
    }
}

impl Corpus {
    /// Computes statistics for this corpus.
    pub fn stats(&self) -> CorpusStats {
        CorpusStats::compute(self)
    }
}

impl core::fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} docs, {} distinct terms, {} occurrences",
            self.num_documents,
            self.terms.len(),
            self.total_occurrences()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TermCounts;
    use proptest::prelude::*;

    fn counts(pairs: &[(&str, u32)]) -> TermCounts {
        pairs.iter().map(|&(t, c)| (Term::from(t), c)).collect()
    }

    fn corpus(docs: &[(&str, &[(&str, u32)])]) -> Corpus {
        docs.iter()
            .map(|&(name, pairs)| (name.to_owned(), counts(pairs)))
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn document_frequency_counts_documents_not_occurrences() {
        let c = corpus(&[
            ("a", &[("hen", 5), ("barn", 1)]),
            ("b", &[("hen", 1)]),
            ("c", &[("cow", 2)]),
        ]);
        let s = c.stats();
        assert_eq!(s.num_documents, 3);
        assert_eq!(s.document_frequency("hen"), 2);
        assert_eq!(s.document_frequency("barn"), 1);
        assert_eq!(s.document_frequency("missing"), 0);
        assert_eq!(s.total_count("hen"), 6);
        assert_eq!(s.num_terms(), 3);
    }

    #[test]
    fn tfidf_sum_matches_formula() {
        let c = corpus(&[
            ("a", &[("hen", 3), ("barn", 1)]),
            ("b", &[("hen", 1), ("cow", 1)]),
        ]);
        let s = c.stats();

        // hen: df = 2 -> idf = ln(3/3) + 1 = 1
        let hen = 3.0 / 4.0 * 1.0 + 1.0 / 2.0 * 1.0;
        assert!(close(s.tfidf_sum("hen"), hen));

        // barn: df = 1 -> idf = ln(3/2) + 1
        let barn = 1.0 / 4.0 * ((3.0f64 / 2.0).ln() + 1.0);
        assert!(close(s.tfidf_sum("barn"), barn));
    }

    #[test]
    fn empty_document_counts_toward_n() {
        let c = corpus(&[("a", &[("hen", 1)]), ("b", &[("hen", 1)]), ("empty", &[])]);
        let s = c.stats();
        assert_eq!(s.num_documents, 3);
        // df = 2, N = 3 -> idf = ln(4/3) + 1, tf = 1 in both documents
        let expected = 2.0 * ((4.0f64 / 3.0).ln() + 1.0);
        assert!(close(s.tfidf_sum("hen"), expected));
    }

    #[test]
    fn compute_does_not_mutate_corpus() {
        let c = corpus(&[("a", &[("hen", 2)]), ("b", &[("cow", 1)])]);
        let before = c.clone();
        let _ = c.stats();
        assert_eq!(c, before);
    }

    #[test]
    fn display_summary() {
        let c = corpus(&[("a", &[("hen", 2)]), ("b", &[("cow", 1)])]);
        assert_eq!(
            c.stats().to_string(),
            "2 docs, 2 distinct terms, 3 occurrences"
        );
    }

    fn arb_corpus() -> impl Strategy<Value = Corpus> {
        prop::collection::vec(
            prop::collection::hash_map("[a-e]{1,2}", 1u32..5, 0..8),
            1..8,
        )
        .prop_map(|docs| {
            docs.into_iter()
                .enumerate()
                .map(|(i, m)| {
                    (
                        format!("doc{i}"),
                        m.into_iter().map(|(t, c)| (Term::from(t), c)).collect(),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn df_bounded_and_tfidf_non_negative(c in arb_corpus()) {
            let s = c.stats();
            for (term, stats) in s.iter() {
                prop_assert!(stats.document_frequency >= 1);
                prop_assert!(stats.document_frequency as usize <= s.num_documents);
                prop_assert!(stats.tfidf_sum >= 0.0, "{term} has negative score");
                prop_assert!(stats.total_count >= u64::from(stats.document_frequency));
            }
        }
    }
}
