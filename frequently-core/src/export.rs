//! Keyword table export: CSV, JSON and the query shortlist.

use core::fmt::Write as _;

use frequently_types::KeywordRow;

/// CSV header, in column order.
pub const CSV_HEADER: &str = "term,docs_with_term,coverage_%,total_count,tfidf_sum";

/// Number of terms in the default shortlist.
pub const SHORTLIST_LEN: usize = 25;

/// Renders rows as CSV with a header line.
///
/// Fields containing `,`, `"` or a line break are quoted, with inner quotes
/// doubled. Every line ends with `\n`.
pub fn to_csv(rows: &[KeywordRow]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for row in rows {
        push_field(&mut out, row.term.as_str());
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            ",{},{:.1},{},{:?}",
            row.docs_with_term, row.coverage_pct, row.total_count, row.tfidf_sum
        );
    }
    out
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Joins the first `limit` terms with `"; "`, ready to paste into a search
/// query builder.
pub fn shortlist(rows: &[KeywordRow], limit: usize) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().take(limit).enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        out.push_str(row.term.as_str());
    }
    out
}

/// Renders rows as a pretty-printed JSON array.
pub fn to_json(rows: &[KeywordRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}
