//! Versioned binary envelope for persisted model artifacts.
//!
//! Layout: `ARTIFACT_MAGIC | format version (u32) | kind | payload`, all
//! encoded with the bincode standard config. Loading rejects files from
//! another format version, files of the wrong kind, trailing garbage and
//! payloads that would decode to more than [`MAX_DECODED_BYTES`].

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use bincode::{
    config::{self, Config},
    error::{DecodeError, EncodeError},
};
use thiserror::Error;
use tracing::debug;

use crate::atomic::{AtomicWriteError, write_atomically};

pub const ARTIFACT_MAGIC: &[u8; 5] = b"HBART";

/// Bump when the encoding of any artifact type changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Upper bound on the memory a decoded artifact may claim. Container lengths
/// read from the file are checked against it before anything is allocated.
pub const MAX_DECODED_BYTES: usize = 256 * 1024 * 1024;

fn decode_config() -> impl Config {
    config::standard().with_limit::<MAX_DECODED_BYTES>()
}

#[derive(bincode::Encode, bincode::Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Vectorizer,
}

/// A type that can be persisted as an artifact file.
pub trait Artifact: bincode::Encode + bincode::Decode<()> {
    const KIND: ArtifactKind;

    /// Structural checks the encoding cannot express, run after decoding.
    fn validate(&self) -> Result<(), ArtifactError> {
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("not an artifact file (missing magic header)")]
    BadMagic,

    #[error("artifact format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("expected a {expected:?} artifact but found a {found:?} artifact")]
    WrongKind {
        expected: ArtifactKind,
        found: ArtifactKind,
    },

    #[error("artifact has {remaining} unexpected trailing bytes")]
    TrailingBytes { remaining: usize },

    #[error("malformed {kind:?} artifact: {reason}")]
    Malformed { kind: ArtifactKind, reason: String },

    #[error("corrupt artifact: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to encode artifact: {0}")]
    Encode(#[from] EncodeError),
}

pub(crate) fn encode<T: Artifact>(value: &T) -> Result<Vec<u8>, ArtifactError> {
    let mut bytes = ARTIFACT_MAGIC.to_vec();
    bytes.extend(bincode::encode_to_vec(
        (ARTIFACT_FORMAT_VERSION, T::KIND),
        config::standard(),
    )?);
    bytes.extend(bincode::encode_to_vec(value, config::standard())?);
    Ok(bytes)
}

pub(crate) fn decode<T: Artifact>(bytes: &[u8]) -> Result<T, ArtifactError> {
    let rest = bytes
        .strip_prefix(ARTIFACT_MAGIC.as_slice())
        .ok_or(ArtifactError::BadMagic)?;

    let (found, read): (u32, usize) = bincode::decode_from_slice(rest, decode_config())?;
    if found != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            found,
            expected: ARTIFACT_FORMAT_VERSION,
        });
    }
    let rest = &rest[read..];

    let (kind, read): (ArtifactKind, usize) =
        bincode::decode_from_slice(rest, decode_config())?;
    if kind != T::KIND {
        return Err(ArtifactError::WrongKind {
            expected: T::KIND,
            found: kind,
        });
    }
    let rest = &rest[read..];

    let (value, read): (T, usize) = bincode::decode_from_slice(rest, decode_config())?;
    match rest.len() - read {
        0 => {
            value.validate()?;
            Ok(value)
        }
        remaining => Err(ArtifactError::TrailingBytes { remaining }),
    }
}

/// Read and decode an artifact file.
pub fn load_artifact<T: Artifact>(path: impl AsRef<Path>) -> Result<T, ArtifactError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), kind = ?T::KIND, bytes = bytes.len(), "Decoding artifact");
    decode(&bytes)
}

/// Encode an artifact and atomically replace `path` with it.
pub fn save_artifact<T: Artifact>(path: impl AsRef<Path>, value: &T) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    let bytes = encode(value)?;
    write_atomically(path, |writer| writer.write_all(&bytes)).map_err(|err| {
        let (AtomicWriteError::Io(source) | AtomicWriteError::Content(source)) = err;
        ArtifactError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), kind = ?T::KIND, bytes = bytes.len(), "Saved artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Classifier, TfidfVectorizer};

    fn sample_vectorizer() -> TfidfVectorizer {
        TfidfVectorizer::from_feature_names(["aspirin", "fever", "pain"], vec![1.1, 0.9, 1.3])
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tfidf_vectorizer.pkl");
        let vectorizer = sample_vectorizer();

        save_artifact(&path, &vectorizer).unwrap();
        let loaded: TfidfVectorizer = load_artifact(&path).unwrap();

        assert_eq!(loaded, vectorizer);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("healthbot_model.pkl");

        let err = load_artifact::<Classifier>(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
        assert!(err.to_string().contains("healthbot_model.pkl"));
    }

    #[test]
    fn test_bad_magic() {
        let err = TfidfVectorizer::from_bytes(b"\x80\x04\x95 pickle bytes").unwrap_err();
        assert!(matches!(err, ArtifactError::BadMagic));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = sample_vectorizer().to_bytes().unwrap();
        // Single varint byte directly after the magic.
        bytes[ARTIFACT_MAGIC.len()] = 7;

        let err = TfidfVectorizer::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::UnsupportedVersion {
                found: 7,
                expected: ARTIFACT_FORMAT_VERSION
            }
        ));
    }

    #[test]
    fn test_wrong_kind() {
        let bytes = sample_vectorizer().to_bytes().unwrap();

        let err = Classifier::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::WrongKind {
                expected: ArtifactKind::Classifier,
                found: ArtifactKind::Vectorizer
            }
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = sample_vectorizer().to_bytes().unwrap();

        let err = TfidfVectorizer::from_bytes(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode(_)));
    }

    /// Envelope header for a vectorizer followed by a raw payload.
    fn vectorizer_bytes_with_payload(payload: &[u8]) -> Vec<u8> {
        let mut bytes = ARTIFACT_MAGIC.to_vec();
        bytes.extend(
            bincode::encode_to_vec(
                (ARTIFACT_FORMAT_VERSION, ArtifactKind::Vectorizer),
                config::standard(),
            )
            .unwrap(),
        );
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_huge_vocabulary_length_is_rejected() {
        // `Some`, then a u64 varint (0xFD marker) claiming ~2^60 entries.
        let mut payload = vec![1, 0xFD];
        payload.extend_from_slice(&0x0FFF_FFFF_FFFF_FFFF_u64.to_le_bytes());

        let err = TfidfVectorizer::from_bytes(&vectorizer_bytes_with_payload(&payload))
            .unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Decode(DecodeError::LimitExceeded)
        ));
    }

    #[test]
    fn test_oversized_idf_length_is_rejected() {
        // No vocabulary, then `Some` idf claiming 100M f64s (800 MB).
        let mut payload = vec![0, 1, 0xFC];
        payload.extend_from_slice(&100_000_000_u32.to_le_bytes());

        let err = TfidfVectorizer::from_bytes(&vectorizer_bytes_with_payload(&payload))
            .unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Decode(DecodeError::LimitExceeded)
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = sample_vectorizer().to_bytes().unwrap();
        bytes.extend_from_slice(&[0, 0]);

        let err = TfidfVectorizer::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ArtifactError::TrailingBytes { remaining: 2 }));
    }

    #[test]
    fn test_unfitted_vectorizer_round_trips() {
        let bytes = TfidfVectorizer::unfitted().to_bytes().unwrap();
        let loaded = TfidfVectorizer::from_bytes(&bytes).unwrap();

        assert!(!loaded.is_fitted());
    }
}
