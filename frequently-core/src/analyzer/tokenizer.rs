//! Streaming Tokenizer Module
//!
//! Splits normalized text into tokens. It is the second stage of the
//! analysis pipeline, taking the normalizer's output and emitting candidate
//! words in left-to-right order.
//!
//! ## What It Does
//!
//! Given normalized input like `"iot sensors 2024 for poultry"` and a minimum
//! length of 3, it emits:
//!
//! ```ignore
//! "iot"
//! "sensors"
//! "for"
//! "poultry"
//! ```
//!
//! `2024` is dropped because it is made only of digits. Tokens shorter than
//! the minimum length are dropped too.
//!
//! ## Key Features
//!
//! - **Zero Allocation**: Tokens are slices of the original string
//! - **Streaming**: Tokens are emitted via a callback
//! - **Order Preserving**: Emission order is source order, which n-gram
//!   adjacency depends on
//!
//! ## The Input Contract
//!
//! The tokenizer expects **pre-normalized** input:
//! - No leading or trailing whitespace
//! - No consecutive spaces between words
//!
//! Violations panic in debug builds.

use core::str;
use memchr::memchr_iter;

/// Returns `true` if the token is non-empty and made only of ASCII digits.
#[inline(always)]
fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Streaming tokenizer with a minimum token length.
///
/// ## Example
///
/// ```
/// use frequently_core::analyzer::tokenizer::Tokenizer;
///
/// let tokenizer = Tokenizer::new(3);
/// let mut out = Vec::new();
/// tokenizer.tokenize("ai for 2024 poultry", |t| out.push(t));
///
/// assert_eq!(out, ["for", "poultry"]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Tokenizer {
    min_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Tokenizer {
    /// Creates a tokenizer that drops tokens shorter than `min_len` bytes.
    ///
    /// A `min_len` of zero behaves like one.
    #[inline]
    pub const fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    /// Minimum token length in bytes.
    #[inline(always)]
    pub const fn min_len(&self) -> usize {
        self.min_len
    }

    /// Returns `true` if `token` survives the digit and length filters.
    #[inline(always)]
    pub fn accepts(&self, token: &str) -> bool {
        token.len() >= self.min_len && !is_all_digits(token)
    }

    /// Tokenizes normalized input, emitting accepted tokens in order.
    #[inline(always)]
    #[allow(clippy::needless_lifetimes)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading whitespace: normalizer contract violated"
        );

        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing whitespace: normalizer contract violated"
        );

        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces: normalizer contract violated"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // SAFETY: `normalized` is valid UTF-8 and we only split on the
                // ASCII space byte, which is never a continuation byte.
                let text = unsafe { str::from_utf8_unchecked(&bytes[start..i]) };
                if self.accepts(text) {
                    emit(text);
                }
            }
            start = i + 1;
        }

        if start < bytes.len() {
            // SAFETY: same invariants as above.
            let text = unsafe { str::from_utf8_unchecked(&bytes[start..]) };
            if self.accepts(text) {
                emit(text);
            }
        }
    }

    /// Collects accepted tokens into a vector.
    pub fn tokens<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut out = Vec::new();
        self.tokenize(normalized, |t| out.push(t));
        out
    }
}
