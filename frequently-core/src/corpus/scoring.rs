//! Scoring functions.
//!
//! Smoothed TF-IDF:
//!
//! ```text
//! tf  = count / total_d              (total_d = 1 for an empty document)
//! idf = ln((N + 1) / (df + 1)) + 1
//! ```
//!
//! The `+1` in the denominator smooths the IDF, and the trailing `+1` keeps
//! it strictly positive even for a term present in every document.

/// Term frequency of a term seen `count` times in a document of
/// `doc_total` term occurrences.
#[inline(always)]
pub fn term_frequency(count: u32, doc_total: u64) -> f64 {
    f64::from(count) / doc_total.max(1) as f64
}

/// Smoothed inverse document frequency.
#[inline(always)]
pub fn smoothed_idf(num_documents: usize, document_frequency: u32) -> f64 {
    let ratio = (num_documents as f64 + 1.0) / (f64::from(document_frequency) + 1.0);
    ratio.ln() + 1.0
}

/// One document's TF-IDF contribution for one term.
#[inline(always)]
pub fn tfidf(count: u32, doc_total: u64, num_documents: usize, document_frequency: u32) -> f64 {
    term_frequency(count, doc_total) * smoothed_idf(num_documents, document_frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tf_basic() {
        assert_eq!(term_frequency(2, 8), 0.25);
        assert_eq!(term_frequency(3, 3), 1.0);
    }

    #[test]
    fn tf_empty_document_guard() {
        assert_eq!(term_frequency(0, 0), 0.0);
    }

    #[test]
    fn idf_term_in_every_document_is_one() {
        assert!((smoothed_idf(2, 2) - 1.0).abs() < 1e-12);
        assert!((smoothed_idf(10, 10) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn idf_rarer_is_larger() {
        let common = smoothed_idf(10, 9);
        let rare = smoothed_idf(10, 1);
        assert!(rare > common);
        assert!((rare - ((11.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn tfidf_product() {
        let expected = 0.5 * ((3.0f64 / 2.0).ln() + 1.0);
        assert!((tfidf(1, 2, 2, 1) - expected).abs() < 1e-12);
    }

    #[test]
    fn idf_always_positive() {
        for n in 1..50usize {
            for df in 1..=n as u32 {
                assert!(smoothed_idf(n, df) >= 1.0);
            }
        }
    }
}
