use serde::Serialize;

use super::{IndexedTerms, VocabularyView};

/// Reduced `{word: index}` export for clients that cannot hold the full
/// vocabulary.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimplifiedVocab<'a> {
    word_to_index: IndexedTerms<'a>,
    total_features: usize,
}

impl<'a> SimplifiedVocab<'a> {
    /// Keep the first `max_words` features in column order. `total_features`
    /// stays the untruncated count.
    #[must_use]
    pub fn new(view: &'a VocabularyView<'_>, max_words: usize) -> Self {
        Self {
            word_to_index: IndexedTerms(view.preview(max_words)),
            total_features: view.vocab_size(),
        }
    }

    /// Number of words in `word_to_index`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.word_to_index.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word_to_index.0.is_empty()
    }

    #[must_use]
    pub fn total_features(&self) -> usize {
        self.total_features
    }
}
