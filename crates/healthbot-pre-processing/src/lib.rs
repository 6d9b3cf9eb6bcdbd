//! Fitted artifacts behind the healthbot text classifier.
//!
//! The classifier and its TF-IDF vectorizer are trained elsewhere and
//! persisted in a small versioned binary envelope (see [`artifact`]). This
//! crate only reads and writes those artifacts and exposes their fitted
//! state; it does no tokenization or inference.

pub mod artifact;
pub mod atomic;
mod classifier;
pub mod pre_processor;

pub use artifact::{Artifact, ArtifactError, ArtifactKind, load_artifact, save_artifact};
pub use atomic::{AtomicWriteError, write_atomically};
pub use classifier::Classifier;
pub use pre_processor::{TfidfVectorizer, VectorizerError};
