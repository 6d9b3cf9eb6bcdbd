//! Extraction of the fitted vocabulary and the two JSON records built from it.

mod full;
mod simplified;

use ahash::HashMap;
use healthbot_pre_processing::{TfidfVectorizer, VectorizerError};
use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::debug;

pub use full::VocabMapping;
pub use simplified::SimplifiedVocab;

/// The three aligned views of a fitted vectorizer.
///
/// `feature_names[i]` is the term with column index `i` in `vocabulary`, and
/// `idf_scores[i]` is its weight.
#[derive(Debug, Clone)]
pub struct VocabularyView<'a> {
    vocabulary: &'a HashMap<String, usize>,
    feature_names: Vec<String>,
    idf_scores: &'a [f64],
}

impl<'a> VocabularyView<'a> {
    /// Read the fitted state of `vectorizer` without modifying it.
    pub fn extract(vectorizer: &'a TfidfVectorizer) -> Result<Self, VectorizerError> {
        vectorizer.check_is_fitted()?;
        let view = Self {
            vocabulary: vectorizer.vocabulary()?,
            feature_names: vectorizer.feature_names()?,
            idf_scores: vectorizer.idf()?,
        };
        debug!(vocab_size = view.vocab_size(), "Extracted vocabulary");
        Ok(view)
    }

    #[must_use]
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        self.vocabulary
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn idf_scores(&self) -> &[f64] {
        self.idf_scores
    }

    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// The first `n` feature names, or all of them if there are fewer.
    #[must_use]
    pub fn preview(&self, n: usize) -> &[String] {
        &self.feature_names[..n.min(self.feature_names.len())]
    }
}

/// Serializes `terms` as a `{term: position}` JSON object, in position order.
///
/// Emitting the map in column order keeps exports byte-identical across runs,
/// whatever the hash order of the source vocabulary.
#[derive(Debug, Clone, Copy)]
struct IndexedTerms<'a>(&'a [String]);

impl Serialize for IndexedTerms<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (idx, term) in self.0.iter().enumerate() {
            map.serialize_entry(term, &idx)?;
        }
        map.end()
    }
}
