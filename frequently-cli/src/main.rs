mod extract;
mod refine;
mod render;
mod settings;

use std::io::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use frequently_core::export;
use frequently_core::{Analyzer, Document, KeywordFinder};
use tracing::{info, warn};

use crate::extract::{load_document, ExtractChain};
use crate::refine::{OllamaClient, RefineOutcome};
use crate::settings::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    if cli.files.len() < 2 {
        bail!("Please upload at least 2 documents.");
    }

    let analyzer = Analyzer::new(cli.analyzer_config()?, cli.stopwords()?)?;
    let rank_config = cli.rank_config()?;
    info!(
        files = cli.files.len(),
        ngram = %analyzer.ngram(),
        stopwords = analyzer.stopwords().len(),
        "extracting text"
    );

    let chain = ExtractChain::default();
    let documents = cli
        .files
        .iter()
        .map(|path| load_document(path, &chain).with_context(|| format!("reading {}", path.display())))
        .collect::<Result<Vec<Document>>>()?;

    let finder = KeywordFinder::new(analyzer);
    let build = finder.build_corpus(&documents);
    if !build.excluded.is_empty() {
        warn!(
            "Some documents had little/no extractable text (likely scanned). Skipped: {}",
            build.excluded.join(", ")
        );
    }

    let rows = KeywordFinder::rank(&build.corpus, &rank_config)
        .context("Need at least 2 documents with extractable text to compute overlap")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::write_keywords(&mut out, &rows)?;

    if let Some(path) = &cli.csv {
        write_file(path, &export::to_csv(&rows))?;
    }
    if let Some(path) = &cli.json {
        write_file(path, &export::to_json(&rows)?)?;
    }

    if cli.llm {
        let client = OllamaClient::new(&cli.ollama_url, &cli.ollama_model);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("starting async runtime")?;
        let outcome = runtime.block_on(client.refine(
            &cli.topic,
            &rows,
            cli.max_llm_terms as usize,
        ));

        match outcome {
            RefineOutcome::Refined { refinement, prompt } => {
                render::write_refinement(&mut out, &refinement)?;
                if let Some(path) = &cli.llm_json {
                    write_file(path, &serde_json::to_string_pretty(&refinement.raw)?)?;
                }
                if let Some(path) = &cli.llm_prompt {
                    write_file(path, &prompt)?;
                }
            }
            RefineOutcome::Unavailable(reason) => warn!("{reason}"),
        }
    }

    out.flush()?;
    Ok(())
}
