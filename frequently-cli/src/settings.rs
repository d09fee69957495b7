//! Command-line options.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use frequently_core::analyzer::{parse_stopword_list, StopwordSet};
use frequently_types::{AnalyzerConfig, ConfigError, NgramSize, RankConfig};

use crate::refine::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};

pub const DEFAULT_TOPIC: &str = "IoT and AI for poultry welfare monitoring and decision support.";

/// Frequently: find keywords shared across a batch of papers, for building
/// literature-review search queries.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Documents to analyze (PDF, or .txt/.md read as plain text). At least two.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Keyword type: 1 = unigrams, 2 = bigrams, 3 = trigrams.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub ngram: u8,

    /// Minimum token length.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    pub min_token_len: u16,

    /// Keep hyphens inside tokens (e.g. "cage-free").
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub keep_hyphens: bool,

    /// Do not use the built-in stopword list.
    #[arg(long)]
    pub no_default_stopwords: bool,

    /// Extra stopwords, separated by commas or newlines.
    #[arg(long, value_name = "WORDS")]
    pub extra_stopwords: Option<String>,

    /// File with extra stopwords, separated by commas or newlines.
    #[arg(long, value_name = "PATH")]
    pub extra_stopwords_file: Option<PathBuf>,

    /// Minimum number of documents a term must appear in.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_docs: u32,

    /// Number of rows to show.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    pub top_k: u32,

    /// Short description of the review topic; guides LLM grouping.
    #[arg(long, default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Clean and group keywords with a local Ollama model.
    #[arg(long)]
    pub llm: bool,

    /// Max candidate terms sent to the LLM.
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_llm_terms: u32,

    /// Ollama base URL.
    #[arg(long, env = "OLLAMA_BASE_URL", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_url: String,

    /// Ollama model.
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_OLLAMA_MODEL)]
    pub ollama_model: String,

    /// Write the keyword table as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write the keyword table as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the LLM output as JSON.
    #[arg(long, value_name = "PATH")]
    pub llm_json: Option<PathBuf>,

    /// Write the prompt sent to the LLM.
    #[arg(long, value_name = "PATH")]
    pub llm_prompt: Option<PathBuf>,
}

impl Cli {
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig, ConfigError> {
        let config = AnalyzerConfig {
            ngram: NgramSize::try_from(self.ngram)?,
            min_token_len: usize::from(self.min_token_len),
            keep_hyphens: self.keep_hyphens,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn rank_config(&self) -> Result<RankConfig, ConfigError> {
        let config = RankConfig {
            min_docs: self.min_docs,
            top_k: self.top_k as usize,
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolves the stopword set from the flags and the optional file.
    pub fn stopwords(&self) -> anyhow::Result<StopwordSet> {
        let mut extra = Vec::new();
        if let Some(words) = &self.extra_stopwords {
            extra.extend(parse_stopword_list(words));
        }
        if let Some(path) = &self.extra_stopwords_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading stopwords from {}", path.display()))?;
            extra.extend(parse_stopword_list(&text));
        }
        Ok(StopwordSet::new(!self.no_default_stopwords, extra))
    }
}
