//! Text extraction from uploaded files.
//!
//! PDFs go through an [`ExtractChain`]: the pure-Rust `pdf-extract` first,
//! then `pdftotext` (poppler) when it is installed. Scanned PDFs without a
//! text layer come out empty, which is not an error here.

use std::io::Write as _;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::Command;

use frequently_core::Document;
use tracing::debug;

/// A single extraction attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("pdf parse failed: {0}")]
    Pdf(String),
    #[error("pdf parser panicked")]
    Panicked,
    #[error("`{0}` not found on PATH")]
    ToolNotFound(String),
    #[error("`{program}` exited with {status}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One strategy for turning PDF bytes into text.
pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extracts the text layer of `bytes`.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// In-process extraction with `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        // Malformed PDFs can panic inside the parser.
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
            Err(_) => Err(ExtractError::Panicked),
        }
    }
}

/// Extraction by running `pdftotext` on a temporary copy of the file.
#[derive(Debug, Clone)]
pub struct ShelloutExtractor {
    program: String,
}

impl Default for ShelloutExtractor {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

impl ShelloutExtractor {
    /// Uses `program`, which must accept `pdftotext` arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Extractor for ShelloutExtractor {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut tmp = tempfile::Builder::new()
            .prefix("frequently-")
            .suffix(".pdf")
            .tempfile()?;
        tmp.write_all(bytes)?;
        tmp.flush()?;

        let output = Command::new(&self.program)
            .args(["-layout", "-nopgbrk", "-enc", "UTF-8"])
            .arg(tmp.path())
            .arg("-")
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ExtractError::ToolNotFound(self.program.clone()),
                _ => ExtractError::Io(e),
            })?;

        if !output.status.success() {
            return Err(ExtractError::ToolFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Ordered extraction strategies; the first non-empty result wins.
pub struct ExtractChain {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for ExtractChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(PdfExtractor),
            Box::new(ShelloutExtractor::default()),
        ])
    }
}

impl ExtractChain {
    /// Creates a chain trying `extractors` in order.
    pub fn new(extractors: Vec<Box<dyn Extractor>>) -> Self {
        Self { extractors }
    }

    /// Returns the trimmed text of the first strategy that yields any, or an
    /// empty string.
    pub fn extract(&self, bytes: &[u8]) -> String {
        for extractor in &self.extractors {
            match extractor.extract(bytes) {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        debug!(extractor = extractor.name(), chars = text.len(), "extracted");
                        return text.to_owned();
                    }
                    debug!(extractor = extractor.name(), "no text");
                }
                Err(e) => debug!(extractor = extractor.name(), error = %e, "extraction failed"),
            }
        }
        String::new()
    }
}

/// Returns `true` for files read as plain text instead of PDF.
pub fn is_plain_text(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("md"))
}

/// Reads `path` into a [`Document`] named after the file.
///
/// Plain-text files are decoded lossily; anything else goes through `chain`.
pub fn load_document(path: &Path, chain: &ExtractChain) -> std::io::Result<Document> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = if is_plain_text(path) {
        String::from_utf8_lossy(&bytes).trim().to_owned()
    } else {
        chain.extract(&bytes)
    };
    Ok(Document::new(name, text))
}
