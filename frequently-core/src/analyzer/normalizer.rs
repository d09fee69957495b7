use std::borrow::Cow;

/// Output byte for each ASCII input byte: the lowercase letter or digit,
/// `-` for a hyphen, and `0` for everything that becomes a separator.
const KEEP_TABLE: [u8; 256] = build_keep_table();

const fn build_keep_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 0usize;
    while b < 128 {
        let byte = b as u8;
        table[b] = match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => byte,
            b'A'..=b'Z' => byte + 32,
            _ => 0,
        };
        b += 1;
    }
    table
}

/// Whitespace as understood by the URL pattern's `\S`: Unicode whitespace
/// plus the ASCII information separators.
#[inline(always)]
fn is_url_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

/// Length in bytes of a URL starting at `rest`, or `None` if `rest` does not
/// start with one.
///
/// A URL is `http` or `www.` followed by at least one non-whitespace char,
/// running up to the next whitespace.
#[inline]
fn url_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let prefix = if bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"http") {
        4
    } else if bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"www.") {
        4
    } else {
        return None;
    };

    let tail = &rest[prefix..];
    let body = tail.find(is_url_terminator).unwrap_or(tail.len());
    if body == 0 {
        return None;
    }
    Some(prefix + body)
}

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Keep `-` as part of tokens instead of treating it as a separator.
    pub keep_hyphens: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { keep_hyphens: true }
    }
}

/// Text normalizer for keyword extraction.
///
/// Performs, in order:
/// - Unicode-aware lowercasing
/// - Removal of URL-looking runs (`http…`, `www.…`) up to the next whitespace
/// - Replacement of every char outside `[a-z0-9]` (and `-` when hyphens are
///   kept) with a separator
/// - Collapsing separators to single spaces, with no leading or trailing space
///
/// The output therefore only contains `[a-z0-9-]` and single ASCII spaces,
/// which is the tokenizer's input contract. Normalizing twice yields the
/// same string.
///
/// # Examples
///
/// ```
/// use frequently_core::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("  Cage-Free   Hens! "), "cage-free hens");
///
/// let split = TextNormalizer::new(NormalizerConfig { keep_hyphens: false });
/// assert_eq!(split.normalize("Cage-Free"), "cage free");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Reuses the buffer's capacity if sufficient, growing only when necessary.
    /// Clears the buffer before writing.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        // ASCII input is lowercased on the fly through the table; anything
        // else goes through full Unicode lowercasing first, since some
        // non-ASCII chars lowercase to ASCII letters.
        let lowered: Cow<'_, str> = if input.is_ascii() {
            Cow::Borrowed(input)
        } else {
            Cow::Owned(input.to_lowercase())
        };
        let text = lowered.as_ref();
        let bytes = text.as_bytes();

        let keep_hyphens = self.config.keep_hyphens;
        let mut pending_space = false;
        let mut i = 0usize;

        while i < bytes.len() {
            let b = bytes[i];

            if b >= 0x80 {
                // Non-ASCII never survives: it is either whitespace or a
                // char outside the kept class. Both separate tokens.
                let ch_len = text[i..].chars().next().map_or(1, char::len_utf8);
                i += ch_len;
                pending_space = true;
                continue;
            }

            if matches!(b, b'h' | b'H' | b'w' | b'W') {
                if let Some(len) = url_len(&text[i..]) {
                    i += len;
                    pending_space = true;
                    continue;
                }
            }

            let mapped = KEEP_TABLE[b as usize];
            if mapped == 0 || (mapped == b'-' && !keep_hyphens) {
                pending_space = true;
            } else {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(mapped as char);
            }
            i += 1;
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}
