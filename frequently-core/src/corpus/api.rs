//! Public API for keyword analysis.

use frequently_types::{CorpusError, KeywordRow, RankConfig, MIN_CORPUS_DOCUMENTS};
use tracing::info;

use crate::analyzer::Analyzer;
use crate::corpus::builder::CorpusBuild;
use crate::corpus::types::{Corpus, Document};

/// Outcome of one keyword analysis run.
#[derive(Debug, Clone, Default)]
pub struct KeywordReport {
    /// Ranked table rows.
    pub rows: Vec<KeywordRow>,
    /// Number of usable documents (`N`).
    pub num_documents: usize,
    /// Documents skipped because no text could be extracted.
    pub excluded: Vec<String>,
}

/// Runs the full pipeline over a batch of documents.
///
/// # Example
///
/// ```
/// use frequently_core::analyzer::{Analyzer, StopwordSet};
/// use frequently_core::corpus::{Document, KeywordFinder};
/// use frequently_types::{AnalyzerConfig, RankConfig};
///
/// let analyzer = Analyzer::new(AnalyzerConfig::default(), StopwordSet::defaults()).unwrap();
/// let finder = KeywordFinder::new(analyzer);
/// let docs = [
///     Document::new("a.pdf", "poultry welfare sensors"),
///     Document::new("b.pdf", "welfare of poultry flocks"),
/// ];
/// let report = finder.run(&docs, &RankConfig::default()).unwrap();
/// assert_eq!(report.rows.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct KeywordFinder {
    analyzer: Analyzer,
}

impl KeywordFinder {
    /// Creates a finder around a configured analyzer.
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    /// The analyzer in use.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Counts terms for every document.
    pub fn build_corpus(&self, documents: &[Document]) -> CorpusBuild {
        Corpus::from_documents(&self.analyzer, documents)
    }

    /// Ranks the terms of `corpus` into table rows.
    ///
    /// `min_docs` is clamped to the corpus size first, so an oversized
    /// threshold still yields the terms common to every document.
    ///
    /// # Errors
    ///
    /// - `CorpusError::Config` if `config` is out of range.
    /// - `CorpusError::Insufficient` if the corpus has fewer than two documents.
    pub fn rank(corpus: &Corpus, config: &RankConfig) -> Result<Vec<KeywordRow>, CorpusError> {
        config.validate()?;

        let n = corpus.len();
        if n < MIN_CORPUS_DOCUMENTS {
            return Err(CorpusError::Insufficient {
                usable: n,
                required: MIN_CORPUS_DOCUMENTS,
            });
        }

        let config = config.clamped_to(n);
        let stats = corpus.stats();
        info!(%stats, min_docs = config.min_docs, top_k = config.top_k, "ranking terms");

        let rows: Vec<KeywordRow> = stats
            .rank(config.min_docs, config.top_k)
            .into_iter()
            .map(|row| KeywordRow::from_ranked(row, n))
            .collect();

        info!(rows = rows.len(), "ranked");
        Ok(rows)
    }

    /// Builds the corpus and ranks it.
    ///
    /// # Errors
    ///
    /// See [`KeywordFinder::rank`]. Documents without text count as unusable.
    pub fn run(
        &self,
        documents: &[Document],
        config: &RankConfig,
    ) -> Result<KeywordReport, CorpusError> {
        let CorpusBuild { corpus, excluded } = self.build_corpus(documents);
        let rows = Self::rank(&corpus, config)?;
        Ok(KeywordReport {
            rows,
            num_documents: corpus.len(),
            excluded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::StopwordSet;
    use frequently_types::{AnalyzerConfig, ConfigError};

    fn finder() -> KeywordFinder {
        KeywordFinder::new(
            Analyzer::new(AnalyzerConfig::default(), StopwordSet::defaults()).unwrap(),
        )
    }

    #[test]
    fn insufficient_corpus() {
        let f = finder();
        let docs = [Document::new("a.pdf", "poultry welfare")];
        assert_eq!(
            f.run(&docs, &RankConfig::default()).unwrap_err(),
            CorpusError::Insufficient {
                usable: 1,
                required: 2
            }
        );

        assert!(matches!(
            KeywordFinder::rank(&Corpus::new(), &RankConfig::default()),
            Err(CorpusError::Insufficient { usable: 0, .. })
        ));
    }

    #[test]
    fn invalid_config_rejected_before_corpus_check() {
        let config = RankConfig {
            min_docs: 0,
            top_k: 10,
        };
        assert_eq!(
            KeywordFinder::rank(&Corpus::new(), &config).unwrap_err(),
            CorpusError::Config(ConfigError::MinDocs)
        );
    }

    #[test]
    fn oversized_min_docs_is_clamped() {
        let f = finder();
        let docs = [
            Document::new("a.pdf", "broiler welfare audits"),
            Document::new("b.pdf", "broiler welfare sensors"),
        ];
        let config = RankConfig {
            min_docs: 10,
            top_k: 10,
        };
        let report = f.run(&docs, &config).unwrap();
        let terms: Vec<&str> = report.rows.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, ["broiler", "welfare"]);
        assert!(report.rows.iter().all(|r| r.coverage_pct == 100.0));
    }

    #[test]
    fn report_lists_excluded_documents() {
        let f = finder();
        let docs = [
            Document::new("a.pdf", "laying hens"),
            Document::new("scan.pdf", ""),
            Document::new("b.pdf", "laying hens"),
            Document::new("c.pdf", "cattle"),
        ];
        let report = f.run(&docs, &RankConfig::default()).unwrap();
        assert_eq!(report.num_documents, 3);
        assert_eq!(report.excluded, ["scan.pdf"]);

        let hens = report.rows.iter().find(|r| r.term.as_str() == "hens").unwrap();
        assert_eq!(hens.docs_with_term, 2);
        assert_eq!(hens.coverage_pct, 66.7);
        assert_eq!(hens.total_count, 2);
    }

    #[test]
    fn empty_table_is_not_an_error() {
        let f = finder();
        let docs = [
            Document::new("a.pdf", "broiler"),
            Document::new("b.pdf", "cattle"),
        ];
        assert!(f.run(&docs, &RankConfig::default()).unwrap().rows.is_empty());
    }
}
