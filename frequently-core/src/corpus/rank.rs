//! Ranking: filter by document frequency, order, truncate.

use core::cmp::Ordering;

use frequently_types::RankedRow;

use crate::corpus::stats::CorpusStats;

/// Ranking order: more documents first, then higher summed TF-IDF, then more
/// occurrences. Remaining ties are broken by term text, ascending, so the
/// output is fully deterministic.
#[inline]
pub fn rank_order(a: &RankedRow, b: &RankedRow) -> Ordering {
    b.docs_with_term
        .cmp(&a.docs_with_term)
        .then_with(|| b.tfidf_sum.total_cmp(&a.tfidf_sum))
        .then_with(|| b.total_count.cmp(&a.total_count))
        .then_with(|| a.term.cmp(&b.term))
}

impl CorpusStats {
    /// Returns at most `top_k` terms present in at least `min_docs`
    /// documents, in [`rank_order`].
    pub fn rank(&self, min_docs: u32, top_k: usize) -> Vec<RankedRow> {
        if top_k == 0 {
            return Vec::new();
        }

        let mut rows: Vec<RankedRow> = self
            .iter()
            .filter(|(_, s)| s.document_frequency >= min_docs)
            .map(|(term, s)| RankedRow {
                term: term.clone(),
                docs_with_term: s.document_frequency,
                total_count: s.total_count,
                tfidf_sum: s.tfidf_sum,
            })
            .collect();

        if rows.len() > top_k {
            rows.select_nth_unstable_by(top_k, rank_order);
            rows.truncate(top_k);
        }
        rows.sort_unstable_by(rank_order);
        rows
    }
}
