use ahash::HashMap;
use tracing::debug;

use super::error::VectorizerError;
use crate::artifact::{Artifact, ArtifactError, ArtifactKind};

/// Fitted state of a TF-IDF vectorizer.
///
/// Holds exactly what a consumer of the vocabulary needs: the term to column
/// index mapping and the IDF weight of each column. Both are optional because
/// a vectorizer can be persisted before it was fitted.
#[derive(bincode::Encode, bincode::Decode, Clone, Debug, Default, PartialEq)]
pub struct TfidfVectorizer {
    /// Term to feature (column) index.
    vocabulary: Option<HashMap<String, usize>>,
    /// Stored IDF weight of each feature, indexed by column.
    idf: Option<Vec<f64>>,
}

impl TfidfVectorizer {
    /// Build a fitted vectorizer from its vocabulary and IDF weights.
    ///
    /// Consistency between the two is checked lazily, by
    /// [`Self::feature_names`] and [`Self::check_is_fitted`].
    #[must_use]
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary: Some(vocabulary),
            idf: Some(idf),
        }
    }

    /// Build a fitted vectorizer whose feature `i` is the `i`-th name.
    #[must_use]
    pub fn from_feature_names<I, S>(feature_names: I, idf: Vec<f64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary = feature_names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name.into(), idx))
            .collect();
        Self::new(vocabulary, idf)
    }

    /// A vectorizer that has not been fitted yet.
    #[must_use]
    pub fn unfitted() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some() && self.idf.is_some()
    }

    /// The term to column index mapping.
    pub fn vocabulary(&self) -> Result<&HashMap<String, usize>, VectorizerError> {
        self.vocabulary
            .as_ref()
            .ok_or(VectorizerError::NotFitted {
                missing: "vocabulary",
            })
    }

    /// IDF weights, aligned with [`Self::feature_names`].
    pub fn idf(&self) -> Result<&[f64], VectorizerError> {
        self.idf
            .as_deref()
            .ok_or(VectorizerError::NotFitted { missing: "idf" })
    }

    pub fn num_features(&self) -> Result<usize, VectorizerError> {
        self.vocabulary().map(HashMap::len)
    }

    /// Feature names ordered by column index, so `feature_names()[i]` is the
    /// term mapped to column `i`.
    ///
    /// Fails if the column indices are not exactly `0..vocab_size`.
    pub fn feature_names(&self) -> Result<Vec<String>, VectorizerError> {
        let vocabulary = self.vocabulary()?;
        let vocab_size = vocabulary.len();
        debug!(vocab_size, "Ordering vocabulary by column index");

        let mut slots: Vec<Option<&String>> = vec![None; vocab_size];
        for (term, &index) in vocabulary {
            let slot = slots
                .get_mut(index)
                .ok_or_else(|| VectorizerError::IndexOutOfRange {
                    term: term.clone(),
                    index,
                    vocab_size,
                })?;
            if let Some(first) = slot.replace(term) {
                return Err(VectorizerError::DuplicateIndex {
                    index,
                    first: first.clone(),
                    second: term.clone(),
                });
            }
        }

        // Every index is in range and unique, so every slot is filled.
        Ok(slots.into_iter().flatten().cloned().collect())
    }

    /// Check that both fitted attributes exist and agree in length.
    pub fn check_is_fitted(&self) -> Result<(), VectorizerError> {
        let vocab_size = self.num_features()?;
        let idf_len = self.idf()?.len();
        if vocab_size != idf_len {
            return Err(VectorizerError::LengthMismatch {
                vocab_size,
                idf_len,
            });
        }
        Ok(())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        crate::artifact::decode(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        crate::artifact::encode(self)
    }
}

impl Artifact for TfidfVectorizer {
    const KIND: ArtifactKind = ArtifactKind::Vectorizer;
}
