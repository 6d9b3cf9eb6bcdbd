//! Pre-processing state for the healthbot classifier.
//!
//! Only the fitted TF-IDF vectorizer lives here.

mod vectorizer;

pub use vectorizer::{TfidfVectorizer, VectorizerError};
