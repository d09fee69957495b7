//! Stopword filtering.
//!
//! A [`StopwordSet`] is built once per run from the built-in list and the
//! user's extra words, then shared read-only by every document.

use rustc_hash::FxHashSet;

/// Built-in stopwords: English function words plus generic academic filler
/// that would otherwise dominate every paper.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "if", "while", "with", "without", "of", "to", "in", "on",
    "for", "from", "by", "as", "at", "is", "are", "was", "were", "be", "been", "being", "this",
    "that", "these", "those", "it", "its", "they", "their", "them", "we", "our", "you", "your",
    "can", "could", "may", "might", "should", "would", "will", "not", "do", "does", "did",
    "than", "then", "there", "here", "such", "also", "into", "over", "under", "between",
    "among", "during", "before", "after", "within", "across", "per", "via", "et", "al",
    // academic filler
    "study", "studies", "results", "result", "method", "methods", "data", "analysis",
    "significant", "using", "use", "used", "based", "model", "models", "approach", "system",
    "systems", "paper", "research",
];

/// Parses a user stopword list.
///
/// Words are separated by commas and/or newlines, trimmed and lowercased;
/// empty entries are dropped.
///
/// ```
/// use frequently_core::analyzer::stopwords::parse_stopword_list;
///
/// let words = parse_stopword_list(" Poultry, chicken\n\n broiler ,,");
/// assert_eq!(words, ["poultry", "chicken", "broiler"]);
/// ```
pub fn parse_stopword_list(text: &str) -> Vec<String> {
    let lowered = text.trim().to_lowercase();
    lowered
        .split([',', '\n'])
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Immutable set of lowercase stopwords.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: FxHashSet<String>,
}

impl StopwordSet {
    /// Creates an empty set (no filtering).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in list only.
    pub fn defaults() -> Self {
        Self::from_words(DEFAULT_STOPWORDS.iter().copied())
    }

    /// Union of the built-in list (when `use_defaults`) and `extra`.
    pub fn new<I, S>(use_defaults: bool, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = if use_defaults {
            Self::defaults()
        } else {
            Self::empty()
        };
        for word in extra {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                set.words.insert(word.to_lowercase());
            }
        }
        set
    }

    /// Builds a set from arbitrary words, lowercasing each.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Exact, case-sensitive membership. Tokens are already lowercase.
    #[inline(always)]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Keeps the tokens that are not stopwords, in order.
    pub fn filter<'t>(&self, tokens: &[&'t str]) -> Vec<&'t str> {
        tokens
            .iter()
            .copied()
            .filter(|t| !self.contains(t))
            .collect()
    }

    /// Number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the set filters nothing.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates the stopwords in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_function_words_and_filler() {
        let set = StopwordSet::defaults();
        for w in ["for", "the", "and", "et", "al", "study", "models", "research"] {
            assert!(set.contains(w), "{w} should be a default stopword");
        }
        assert!(!set.contains("poultry"));
    }

    #[test]
    fn defaults_are_lowercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for w in DEFAULT_STOPWORDS {
            assert_eq!(*w, w.to_lowercase());
            assert!(seen.insert(*w), "duplicate default stopword {w}");
        }
        assert_eq!(StopwordSet::defaults().len(), DEFAULT_STOPWORDS.len());
    }

    #[test]
    fn union_with_extra() {
        let set = StopwordSet::new(true, ["Poultry", " chicken "]);
        assert!(set.contains("poultry"));
        assert!(set.contains("chicken"));
        assert!(set.contains("the"));
        assert_eq!(set.len(), DEFAULT_STOPWORDS.len() + 2);
    }

    #[test]
    fn extra_only_when_defaults_disabled() {
        let set = StopwordSet::new(false, ["poultry"]);
        assert!(set.contains("poultry"));
        assert!(!set.contains("the"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_filters_nothing() {
        let set = StopwordSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.filter(&["the", "hen"]), ["the", "hen"]);
    }

    #[test]
    fn filter_preserves_order() {
        let set = StopwordSet::defaults();
        let tokens = ["iot", "sensors", "for", "poultry", "the", "welfare"];
        assert_eq!(set.filter(&tokens), ["iot", "sensors", "poultry", "welfare"]);
    }

    #[test]
    fn membership_is_exact() {
        let set = StopwordSet::defaults();
        assert!(!set.contains("FOR"));
        assert!(!set.contains("fore"));
    }

    #[test]
    fn parse_list_variants() {
        assert!(parse_stopword_list("").is_empty());
        assert!(parse_stopword_list("  \n , ,\n").is_empty());
        assert_eq!(parse_stopword_list("A,B"), ["a", "b"]);
        assert_eq!(parse_stopword_list("cage-free\nfree range"), ["cage-free", "free range"]);
    }
}
