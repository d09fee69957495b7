//! Corpus types.

use std::collections::btree_map::{self, BTreeMap};

use crate::analyzer::TermCounts;

/// A named document with its extracted text.
///
/// Empty (or whitespace-only) text means extraction failed; such documents
/// are left out of the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name, usually the file name.
    pub name: String,
    /// Extracted raw text.
    pub text: String,
}

impl Document {
    /// Creates a document.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Returns `true` if there is no usable text.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Term counts for every usable document of one run, keyed by document name.
///
/// Ordered by name so that every pass over the corpus is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub(crate) documents: BTreeMap<String, TermCounts>,
}

impl Corpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document's counts, returning the counts it replaced.
    pub fn insert(&mut self, name: impl Into<String>, counts: TermCounts) -> Option<TermCounts> {
        self.documents.insert(name.into(), counts)
    }

    /// Returns the number of documents in the corpus.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the corpus contains no documents.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Counts for one document.
    pub fn get(&self, name: &str) -> Option<&TermCounts> {
        self.documents.get(name)
    }

    /// Documents in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, TermCounts> {
        self.documents.iter()
    }

    /// Document names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl FromIterator<(String, TermCounts)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (String, TermCounts)>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = (&'a String, &'a TermCounts);
    type IntoIter = btree_map::Iter<'a, String, TermCounts>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
