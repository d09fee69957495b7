//! Terminal output.

use std::collections::BTreeMap;
use std::io::{self, Write};

use frequently_core::export::{shortlist, SHORTLIST_LEN};
use frequently_types::KeywordRow;

use crate::refine::Refinement;

const HEADERS: [&str; 5] = ["term", "docs_with_term", "coverage_%", "total_count", "tfidf_sum"];

/// Writes the keyword table with aligned columns.
pub fn write_table<W: Write>(out: &mut W, rows: &[KeywordRow]) -> io::Result<()> {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.term.to_string(),
                r.docs_with_term.to_string(),
                format!("{:.1}", r.coverage_pct),
                r.total_count.to_string(),
                format!("{:.4}", r.tfidf_sum),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write!(out, "{:<w$}", HEADERS[0], w = widths[0])?;
    for (h, w) in HEADERS.iter().zip(widths).skip(1) {
        write!(out, "  {h:>w$}")?;
    }
    writeln!(out)?;

    for row in &cells {
        write!(out, "{:<w$}", row[0], w = widths[0])?;
        for (cell, w) in row.iter().zip(widths).skip(1) {
            write!(out, "  {cell:>w$}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the table, then the shortlist.
pub fn write_keywords<W: Write>(out: &mut W, rows: &[KeywordRow]) -> io::Result<()> {
    writeln!(out, "Common terms across documents")?;
    writeln!(out)?;
    write_table(out, rows)?;
    writeln!(out)?;
    writeln!(out, "Keyword shortlist")?;
    let list = shortlist(rows, SHORTLIST_LEN);
    if list.is_empty() {
        writeln!(out, "No shortlist available.")
    } else {
        writeln!(out, "{list}")
    }
}

fn write_list<W: Write>(out: &mut W, title: &str, items: &[String]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    if items.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for item in items {
        writeln!(out, "  - {item}")?;
    }
    Ok(())
}

fn write_groups<W: Write>(
    out: &mut W,
    title: &str,
    groups: &BTreeMap<String, Vec<String>>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    if groups.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (name, terms) in groups {
        writeln!(out, "  {name}: {}", terms.join("; "))?;
    }
    Ok(())
}

/// Writes the LLM refinement sections.
pub fn write_refinement<W: Write>(out: &mut W, refinement: &Refinement) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "LLM refinement output")?;
    write_list(out, "Cleaned keywords", &refinement.cleaned_keywords)?;
    write_groups(out, "Grouped buckets", &refinement.grouped_buckets)?;
    write_groups(out, "Suggested expansions", &refinement.suggested_expansions)?;
    write_list(out, "Suggested stopwords", &refinement.stopword_suggestions)?;
    if !refinement.notes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Notes")?;
        writeln!(out, "  {}", refinement.notes)?;
    }
    Ok(())
}
