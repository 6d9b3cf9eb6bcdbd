use thiserror::Error;

/// Problems with the fitted state of a [`super::TfidfVectorizer`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VectorizerError {
    /// The vectorizer was persisted before `fit` populated this attribute.
    #[error("vectorizer is not fitted: `{missing}` is not set")]
    NotFitted { missing: &'static str },

    #[error("vectorizer has {vocab_size} vocabulary terms but {idf_len} idf scores")]
    LengthMismatch { vocab_size: usize, idf_len: usize },

    #[error("term {term:?} has column index {index}, outside 0..{vocab_size}")]
    IndexOutOfRange {
        term: String,
        index: usize,
        vocab_size: usize,
    },

    #[error("column index {index} is assigned to both {first:?} and {second:?}")]
    DuplicateIndex {
        index: usize,
        first: String,
        second: String,
    },
}
