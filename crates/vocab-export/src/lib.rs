//! # vocab-export
//!
//! Exports the vocabulary of the healthbot TF-IDF vectorizer to JSON.
//!
//! Two documents are written:
//!
//! - `tfidf_vocabulary.json`: the full [`VocabMapping`] (term to index map,
//!   ordered feature names, vocabulary size and IDF scores).
//! - `android_vocabulary.json`: a [`SimplifiedVocab`] with only the first
//!   [`SIMPLIFIED_VOCAB_SIZE`] terms, for the mobile client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vocab_export::{Exporter, load_artifacts};
//!
//! let (_model, vectorizer) = load_artifacts("healthbot_model.pkl", "tfidf_vectorizer.pkl")?;
//! let summary = Exporter::new().export(&vectorizer, &mut std::io::stdout())?;
//! println!("{} terms exported", summary.vocab_size);
//! # Ok::<(), anyhow::Error>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;

mod error;
pub mod export;
mod writer;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
pub use error::ExportError;
pub use export::{SimplifiedVocab, VocabMapping, VocabularyView};
use healthbot_pre_processing::{Classifier, TfidfVectorizer, load_artifact};
use tracing::{info, warn};
pub use writer::write_json_atomic;

pub const DEFAULT_MODEL_PATH: &str = "healthbot_model.pkl";
pub const DEFAULT_VECTORIZER_PATH: &str = "tfidf_vectorizer.pkl";
pub const DEFAULT_FULL_OUTPUT: &str = "tfidf_vocabulary.json";
pub const DEFAULT_SIMPLIFIED_OUTPUT: &str = "android_vocabulary.json";

/// Words kept in the simplified export: feature indices `0..=2000`.
pub const SIMPLIFIED_VOCAB_SIZE: usize = 2001;

/// Feature names echoed to the report after the full export.
pub const FEATURE_PREVIEW_LEN: usize = 100;

/// Load the classifier and the vectorizer it was trained with.
///
/// The classifier is not used by the exports. Loading it confirms the
/// artifact pair is readable, and a feature-width disagreement between the
/// two is logged.
pub fn load_artifacts(
    model_path: impl AsRef<Path>,
    vectorizer_path: impl AsRef<Path>,
) -> anyhow::Result<(Classifier, TfidfVectorizer)> {
    let model_path = model_path.as_ref();
    let vectorizer_path = vectorizer_path.as_ref();

    let model: Classifier = load_artifact(model_path)
        .with_context(|| format!("Failed to load model: {}", model_path.display()))?;
    let vectorizer: TfidfVectorizer = load_artifact(vectorizer_path)
        .with_context(|| format!("Failed to load vectorizer: {}", vectorizer_path.display()))?;
    info!(
        classes = model.num_classes(),
        fitted = vectorizer.is_fitted(),
        "Loaded model artifacts"
    );

    if let (Some(model_features), Ok(vocab_size)) =
        (model.num_features(), vectorizer.num_features())
        && model_features != vocab_size
    {
        warn!(
            model_features,
            vocab_size, "Model and vectorizer disagree on the number of features"
        );
    }

    Ok((model, vectorizer))
}

/// What an export run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub vocab_size: usize,
    /// First [`FEATURE_PREVIEW_LEN`] feature names.
    pub preview: Vec<String>,
    pub simplified_words: usize,
    pub full_output: PathBuf,
    pub simplified_output: PathBuf,
}

/// Builder for an export run.
///
/// Defaults match the fixed file names and word limit of the mobile client.
///
/// ```rust,no_run
/// use vocab_export::Exporter;
///
/// let exporter = Exporter::new()
///     .with_full_output("out/tfidf_vocabulary.json")
///     .with_max_words(500);
/// ```
#[derive(Debug, Clone)]
pub struct Exporter {
    full_output: PathBuf,
    simplified_output: PathBuf,
    max_words: usize,
}

impl Exporter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            full_output: PathBuf::from(DEFAULT_FULL_OUTPUT),
            simplified_output: PathBuf::from(DEFAULT_SIMPLIFIED_OUTPUT),
            max_words: SIMPLIFIED_VOCAB_SIZE,
        }
    }

    #[must_use]
    pub fn with_full_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.full_output = path.into();
        self
    }

    #[must_use]
    pub fn with_simplified_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.simplified_output = path.into();
        self
    }

    /// Set how many words the simplified export keeps.
    #[must_use]
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    #[must_use]
    pub fn full_output(&self) -> &Path {
        &self.full_output
    }

    #[must_use]
    pub fn simplified_output(&self) -> &Path {
        &self.simplified_output
    }

    #[must_use]
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Write both exports for `vectorizer`, reporting progress to `report`.
    ///
    /// Nothing is written if the vectorizer is not fitted. The full export is
    /// written before the simplified one.
    pub fn export<W: Write>(
        &self,
        vectorizer: &TfidfVectorizer,
        report: &mut W,
    ) -> anyhow::Result<ExportSummary> {
        let view = VocabularyView::extract(vectorizer).map_err(ExportError::from)?;

        let full = VocabMapping::new(&view);
        write_json_atomic(&self.full_output, &full)?;
        info!(path = %self.full_output.display(), vocab_size = full.vocab_size(), "Full vocabulary exported");

        let preview = view.preview(FEATURE_PREVIEW_LEN);
        writeln!(report, "Vocabulary size: {}", view.vocab_size())?;
        writeln!(report, "First {FEATURE_PREVIEW_LEN} features: {preview:?}")?;

        let simplified = SimplifiedVocab::new(&view, self.max_words);
        write_json_atomic(&self.simplified_output, &simplified)?;
        info!(
            path = %self.simplified_output.display(),
            words = simplified.len(),
            total_features = simplified.total_features(),
            "Simplified vocabulary exported"
        );
        writeln!(
            report,
            "Simplified vocabulary saved with {} words",
            simplified.len()
        )?;

        Ok(ExportSummary {
            vocab_size: view.vocab_size(),
            preview: preview.to_vec(),
            simplified_words: simplified.len(),
            full_output: self.full_output.clone(),
            simplified_output: self.simplified_output.clone(),
        })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Load both artifacts and write both exports.
///
/// Artifacts are fully loaded before anything is written, so a missing or
/// corrupt input leaves existing outputs untouched.
pub fn run<W: Write>(
    model_path: impl AsRef<Path>,
    vectorizer_path: impl AsRef<Path>,
    exporter: &Exporter,
    report: &mut W,
) -> anyhow::Result<ExportSummary> {
    let (_model, vectorizer) = load_artifacts(model_path, vectorizer_path)?;
    exporter
        .export(&vectorizer, report)
        .with_context(|| "Failed to export vocabulary")
}
