//! N-gram construction.
//!
//! Turns an ordered token stream into terms: each token on its own for
//! unigrams, or every contiguous window of `n` tokens joined by a single
//! space. A stream of `L` tokens yields exactly `max(0, L - n + 1)` terms.

use frequently_types::NgramSize;
use smallvec::SmallVec;

/// Number of n-grams produced from `token_count` tokens.
#[inline(always)]
pub const fn count_ngrams(token_count: usize, n: NgramSize) -> usize {
    let n = n.len();
    if token_count < n {
        0
    } else {
        token_count - n + 1
    }
}

/// Sliding window over a token stream.
///
/// Holds the last `n` tokens and a reusable join buffer, so streaming
/// callers emit every term without a per-term allocation.
///
/// ```
/// use frequently_core::analyzer::ngram::NgramWindow;
/// use frequently_types::NgramSize;
///
/// let mut window = NgramWindow::new(NgramSize::Bigram);
/// assert_eq!(window.push("poultry"), None);
/// assert_eq!(window.push("welfare"), Some("poultry welfare"));
/// assert_eq!(window.push("monitoring"), Some("welfare monitoring"));
/// ```
#[derive(Debug)]
pub struct NgramWindow<'t> {
    n: usize,
    window: SmallVec<[&'t str; 3]>,
    joined: String,
}

impl<'t> NgramWindow<'t> {
    /// Creates an empty window of size `n`.
    pub fn new(n: NgramSize) -> Self {
        Self {
            n: n.len(),
            window: SmallVec::new(),
            joined: String::with_capacity(64),
        }
    }

    /// Pushes the next token and returns the completed term, if any.
    ///
    /// The returned slice is only valid until the next push.
    #[inline]
    pub fn push(&mut self, token: &'t str) -> Option<&str> {
        if self.n == 1 {
            return Some(token);
        }

        if self.window.len() == self.n {
            self.window.remove(0);
        }
        self.window.push(token);
        if self.window.len() < self.n {
            return None;
        }

        self.joined.clear();
        for (i, part) in self.window.iter().enumerate() {
            if i > 0 {
                self.joined.push(' ');
            }
            self.joined.push_str(part);
        }
        Some(&self.joined)
    }

    /// Forgets buffered tokens, keeping the allocation.
    pub fn reset(&mut self) {
        self.window.clear();
        self.joined.clear();
    }
}

/// Builds all terms for `tokens`, in order.
///
/// Terms may repeat; repetition is meaningful and counted downstream.
pub fn ngrams(tokens: &[&str], n: NgramSize) -> Vec<String> {
    if n == NgramSize::Unigram {
        return tokens.iter().map(|t| (*t).to_owned()).collect();
    }

    let mut out = Vec::with_capacity(count_ngrams(tokens.len(), n));
    let mut window = NgramWindow::new(n);
    for token in tokens {
        if let Some(term) = window.push(token) {
            out.push(term.to_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unigrams_are_tokens() {
        let tokens = ["poultry", "welfare", "poultry"];
        assert_eq!(ngrams(&tokens, NgramSize::Unigram), tokens);
    }

    #[test]
    fn bigrams_basic() {
        let tokens = ["poultry", "welfare", "monitoring"];
        assert_eq!(
            ngrams(&tokens, NgramSize::Bigram),
            ["poultry welfare", "welfare monitoring"]
        );
    }

    #[test]
    fn trigrams_basic() {
        let tokens = ["iot", "sensors", "poultry", "welfare"];
        assert_eq!(
            ngrams(&tokens, NgramSize::Trigram),
            ["iot sensors poultry", "sensors poultry welfare"]
        );
    }

    #[test]
    fn short_input_yields_nothing() {
        assert!(ngrams(&[], NgramSize::Bigram).is_empty());
        assert!(ngrams(&["one"], NgramSize::Bigram).is_empty());
        assert!(ngrams(&["one", "two"], NgramSize::Trigram).is_empty());
        assert!(ngrams(&[], NgramSize::Unigram).is_empty());
    }

    #[test]
    fn repeats_are_kept() {
        let tokens = ["cage", "free", "cage", "free"];
        assert_eq!(
            ngrams(&tokens, NgramSize::Bigram),
            ["cage free", "free cage", "cage free"]
        );
    }

    #[test]
    fn count_basic() {
        assert_eq!(count_ngrams(5, NgramSize::Unigram), 5);
        assert_eq!(count_ngrams(5, NgramSize::Bigram), 4);
        assert_eq!(count_ngrams(5, NgramSize::Trigram), 3);
        assert_eq!(count_ngrams(2, NgramSize::Trigram), 0);
        assert_eq!(count_ngrams(0, NgramSize::Unigram), 0);
    }

    #[test]
    fn window_reset_starts_over() {
        let mut w = NgramWindow::new(NgramSize::Bigram);
        assert_eq!(w.push("a"), None);
        w.reset();
        assert_eq!(w.push("b"), None);
        assert_eq!(w.push("c"), Some("b c"));
    }

    proptest! {
        #[test]
        fn count_law(words in prop::collection::vec("[a-z]{1,5}", 0..30), n in 1u8..=3) {
            let n = NgramSize::try_from(n).unwrap();
            let tokens: Vec<&str> = words.iter().map(String::as_str).collect();
            let grams = ngrams(&tokens, n);

            prop_assert_eq!(grams.len(), tokens.len().saturating_sub(n.len() - 1));
            prop_assert_eq!(grams.len(), count_ngrams(tokens.len(), n));

            for (i, gram) in grams.iter().enumerate() {
                let parts: Vec<&str> = gram.split(' ').collect();
                prop_assert_eq!(parts.len(), n.len());
                prop_assert_eq!(&parts[..], &tokens[i..i + n.len()]);
            }
        }
    }
}
