use crate::artifact::{Artifact, ArtifactError, ArtifactKind};

/// Trained linear classifier over TF-IDF features.
///
/// One coefficient row and one intercept per class.
#[derive(bincode::Encode, bincode::Decode, Clone, Debug, PartialEq)]
pub struct Classifier {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl Classifier {
    pub fn new(classes: Vec<String>, coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Self {
        let classifier = Self {
            classes,
            coefficients,
            intercepts,
        };
        if let Err(reason) = classifier.check_shape() {
            panic!("{reason}");
        }
        classifier
    }

    /// One coefficient row and one intercept per class, rows of equal width.
    fn check_shape(&self) -> Result<(), String> {
        let num_classes = self.classes.len();
        if self.coefficients.len() != num_classes {
            return Err(format!(
                "one coefficient row is required per class ({num_classes} classes, {} rows)",
                self.coefficients.len()
            ));
        }
        if self.intercepts.len() != num_classes {
            return Err(format!(
                "one intercept is required per class ({num_classes} classes, {} intercepts)",
                self.intercepts.len()
            ));
        }
        if let Some(row) = self
            .coefficients
            .windows(2)
            .position(|rows| rows[0].len() != rows[1].len())
        {
            return Err(format!(
                "coefficient rows must all have the same width (row {} differs)",
                row + 1
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Width of the feature vectors the classifier was trained on, if it has
    /// any classes at all.
    #[must_use]
    pub fn num_features(&self) -> Option<usize> {
        self.coefficients.first().map(Vec::len)
    }

    #[must_use]
    pub fn intercepts(&self) -> &[f64] {
        &self.intercepts
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        crate::artifact::decode(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        crate::artifact::encode(self)
    }
}

impl Artifact for Classifier {
    const KIND: ArtifactKind = ArtifactKind::Classifier;

    fn validate(&self) -> Result<(), ArtifactError> {
        self.check_shape()
            .map_err(|reason| ArtifactError::Malformed {
                kind: Self::KIND,
                reason,
            })
    }
}
