use serde::Serialize;

use super::{IndexedTerms, VocabularyView};

/// The complete vocabulary export.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VocabMapping<'a> {
    vocabulary: IndexedTerms<'a>,
    feature_names: &'a [String],
    vocab_size: usize,
    idf_scores: &'a [f64],
}

impl<'a> VocabMapping<'a> {
    #[must_use]
    pub fn new(view: &'a VocabularyView<'_>) -> Self {
        Self {
            vocabulary: IndexedTerms(view.feature_names()),
            feature_names: view.feature_names(),
            vocab_size: view.vocab_size(),
            idf_scores: view.idf_scores(),
        }
    }

    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::export::tests::{numbered_vectorizer, sample_vectorizer};

    #[test]
    fn test_full_export_record() {
        let vectorizer = sample_vectorizer();
        let view = VocabularyView::extract(&vectorizer).unwrap();

        let value = serde_json::to_value(VocabMapping::new(&view)).unwrap();

        assert_eq!(
            value,
            json!({
                "vocabulary": {"aspirin": 0, "fever": 1, "pain": 2},
                "feature_names": ["aspirin", "fever", "pain"],
                "vocab_size": 3,
                "idf_scores": [1.1, 0.9, 1.3]
            })
        );
    }

    #[test]
    fn test_full_export_field_order() {
        let vectorizer = sample_vectorizer();
        let view = VocabularyView::extract(&vectorizer).unwrap();

        let json = serde_json::to_string(&VocabMapping::new(&view)).unwrap();

        assert_eq!(
            json,
            r#"{"vocabulary":{"aspirin":0,"fever":1,"pain":2},"feature_names":["aspirin","fever","pain"],"vocab_size":3,"idf_scores":[1.1,0.9,1.3]}"#
        );
    }

    #[test]
    fn test_full_export_is_aligned() {
        let vectorizer = numbered_vectorizer(2500);
        let view = VocabularyView::extract(&vectorizer).unwrap();

        let value = serde_json::to_value(VocabMapping::new(&view)).unwrap();
        let names = value["feature_names"].as_array().unwrap();
        let vocabulary = value["vocabulary"].as_object().unwrap();

        assert_eq!(value["vocab_size"], 2500);
        assert_eq!(names.len(), 2500);
        assert_eq!(value["idf_scores"].as_array().unwrap().len(), 2500);
        assert_eq!(vocabulary.len(), 2500);
        for (idx, name) in names.iter().enumerate() {
            assert_eq!(vocabulary[name.as_str().unwrap()], idx);
        }
    }
}
