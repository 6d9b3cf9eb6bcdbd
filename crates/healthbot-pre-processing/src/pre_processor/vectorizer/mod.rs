mod error;
mod tfidf_vectorizer;

pub use error::VectorizerError;
pub use tfidf_vectorizer::TfidfVectorizer;
