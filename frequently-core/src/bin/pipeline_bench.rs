//! Pipeline throughput benchmark.
//!
//! Measures the per-document stages on a large plain-text file (for example
//! the concatenated `pdftotext` output of a paper collection):
//!
//! 1. **Normalize**: lowercase, URL and punctuation stripping
//! 2. **Tokenize**: splitting pre-normalized text
//! 3. **Count**: the full analyzer, stopwords and n-grams included
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/pipeline_bench /path/to/corpus.txt          # unigrams
//! ./target/release/pipeline_bench /path/to/corpus.txt 2        # bigrams
//! ```
//!
//! Build in release mode and use an input of 100MB+ for stable numbers.

use std::env;
use std::fs;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use frequently_core::analyzer::{Analyzer, StopwordSet, TextNormalizer, Tokenizer};
use frequently_types::{AnalyzerConfig, NgramSize};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let Some(path) = args.get(1) else {
        eprintln!("Usage: pipeline_bench <path> [ngram]");
        return ExitCode::FAILURE;
    };

    let ngram = match args.get(2).map(|s| s.parse::<u8>()) {
        None => NgramSize::Unigram,
        Some(Ok(n)) => match NgramSize::try_from(n) {
            Ok(size) => size,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        Some(Err(e)) => {
            eprintln!("invalid n-gram size: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Loading file...");
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let input = String::from_utf8_lossy(&bytes);

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("N-gram:    {}\n", ngram.label());

    bench_normalize(&input);
    bench_tokenize(&input);
    bench_count(&input, ngram);

    ExitCode::SUCCESS
}

fn bench_normalize(input: &str) {
    let normalizer = TextNormalizer::default();
    let mut out = String::with_capacity(input.len());

    println!("=== Normalize ===");

    warmup(|| normalizer.normalize_into(input, &mut out));
    let elapsed = measure(|| normalizer.normalize_into(input, &mut out));

    print_perf("Normalize", input.len(), elapsed, 0);
}

fn bench_tokenize(input: &str) {
    let normalized = TextNormalizer::default().normalize(input);
    let tokenizer = Tokenizer::default();

    println!("=== Tokenize ===");

    warmup(|| {
        let mut sink = 0u64;
        tokenizer.tokenize(&normalized, |_| sink += 1);
        std::hint::black_box(sink);
    });

    let mut tokens = 0u64;
    let elapsed = measure(|| {
        let mut local = 0u64;
        tokenizer.tokenize(&normalized, |_| local += 1);
        tokens = local;
        std::hint::black_box(tokens);
    });

    print_perf("Tokenize", normalized.len(), elapsed, tokens);
}

fn bench_count(input: &str, ngram: NgramSize) {
    let config = AnalyzerConfig {
        ngram,
        ..Default::default()
    };
    let analyzer = match Analyzer::new(config, StopwordSet::defaults()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    println!("=== Count terms ===");

    warmup(|| {
        std::hint::black_box(analyzer.count_terms(input));
    });

    let mut terms = 0u64;
    let elapsed = measure(|| {
        let counts = analyzer.count_terms(input);
        terms = counts.values().map(|&c| u64::from(c)).sum();
        std::hint::black_box(&counts);
    });

    print_perf("Count", input.len(), elapsed, terms);
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, items: u64) {
    let secs = elapsed.as_secs_f64();
    let mib = input_bytes as f64 / (1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Stage       : {label}");
    println!("Elapsed     : {secs:.3} s");
    println!("Throughput  : {:.1} MiB/s", mib / secs);

    if items > 0 {
        println!("Items       : {}", fmt_count(items));
        println!("Items/sec   : {}", fmt_count((items as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    match b {
        b if b >= 1 << 30 => format!("{:.2} GiB", b as f64 / (1u64 << 30) as f64),
        b if b >= 1 << 20 => format!("{:.2} MiB", b as f64 / (1u64 << 20) as f64),
        b if b >= 1 << 10 => format!("{:.2} KiB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }
    out
}
