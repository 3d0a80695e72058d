//! On-disk bundle: a flat index, the sentence encoder and the parallel
//! sentence/summary arrays, written by an external build step.
//!
//! Layout: 8-byte magic, little-endian `u32` format version, then the
//! bincode payload.

use crate::embedding::SentenceEncoder;
use crate::error::{ChatError, Result};
use crate::vector_db::FlatIndex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const BUNDLE_MAGIC: &[u8; 8] = b"SQABNDL\0";
pub const BUNDLE_VERSION: u32 = 1;

const HEADER_LEN: usize = BUNDLE_MAGIC.len() + 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub index: FlatIndex,
    pub encoder: SentenceEncoder,
    pub sentences: Vec<String>,
    pub summaries: Vec<String>,
}

impl Bundle {
    pub fn new(
        index: FlatIndex,
        encoder: SentenceEncoder,
        sentences: Vec<String>,
        summaries: Vec<String>,
    ) -> Result<Self> {
        let bundle = Bundle {
            index,
            encoder,
            sentences,
            summaries,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            ChatError::deserialize(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN || &bytes[..BUNDLE_MAGIC.len()] != BUNDLE_MAGIC {
            return Err(ChatError::deserialize("not a sentence-qa bundle"));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[BUNDLE_MAGIC.len()..HEADER_LEN]);
        let version = u32::from_le_bytes(version);
        if version != BUNDLE_VERSION {
            return Err(ChatError::deserialize(format!(
                "unsupported bundle version {} (expected {})",
                version, BUNDLE_VERSION
            )));
        }

        let bundle: Bundle = bincode::deserialize(&bytes[HEADER_LEN..])?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(BUNDLE_MAGIC);
        bytes.extend_from_slice(&BUNDLE_VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Hard failures for shapes nothing downstream can work with; softer
    /// mismatches only warn since out-of-range hits are skipped at format time.
    fn validate(&self) -> Result<()> {
        if self.sentences.len() != self.summaries.len() {
            return Err(ChatError::deserialize(format!(
                "{} sentences but {} summaries",
                self.sentences.len(),
                self.summaries.len()
            )));
        }
        self.encoder.validate()?;

        if self.index.len() != self.sentences.len() {
            tracing::warn!(
                "Index holds {} vectors for {} sentences",
                self.index.len(),
                self.sentences.len()
            );
        }
        if self.index.dimension() != self.encoder.dimension() {
            tracing::warn!(
                "Index dimension {} differs from encoder dimension {}; searches will fail",
                self.index.dimension(),
                self.encoder.dimension()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::vector_db::Metric;
    use ndarray::Array2;
    use rustc_hash::FxHashMap;
    use tempfile::tempdir;

    /// Ten topic words, one per axis, one sentence per topic.
    pub(crate) fn sample_bundle() -> Bundle {
        let topics = [
            "rust", "python", "memory", "network", "disk", "cache", "thread", "parser",
            "crypto", "compiler",
        ];
        let dim = topics.len();

        let mut vocab = FxHashMap::default();
        for (i, topic) in topics.iter().enumerate() {
            vocab.insert(topic.to_string(), i);
        }
        let encoder = SentenceEncoder::new(vocab, Array2::eye(dim), true).unwrap();

        let sentences: Vec<String> = topics
            .iter()
            .map(|t| format!("Sentence about {}.", t))
            .collect();
        let summaries: Vec<String> = topics
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i % 2 == 0 {
                    format!("Summary of {}.", t)
                } else {
                    crate::response::SUMMARY_UNAVAILABLE.to_string()
                }
            })
            .collect();

        let texts: Vec<&str> = sentences.iter().map(String::as_str).collect();
        let mut index = FlatIndex::new(dim, Metric::L2);
        index.add(encoder.encode(&texts).view()).unwrap();

        Bundle::new(index, encoder, sentences, summaries).unwrap()
    }

    #[test]
    fn test_bytes_roundtrip_keeps_parallel_arrays() {
        let bundle = sample_bundle();
        let decoded = Bundle::from_bytes(&bundle.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.len(), 10);
        assert_eq!(decoded.sentences.len(), decoded.summaries.len());
        assert_eq!(decoded.index.len(), 10);
        assert_eq!(decoded.encoder.dimension(), 10);
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        fs::write(&path, sample_bundle().to_bytes().unwrap()).unwrap();

        let bundle = Bundle::read_from(&path).unwrap();
        assert_eq!(bundle.sentences[0], "Sentence about rust.");
    }

    #[test]
    fn test_bad_magic_rejected() {
        let err = Bundle::from_bytes(b"PICKLE\x80\x04 not ours").unwrap_err();
        assert!(matches!(err, ChatError::Deserialize(_)));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut bytes = sample_bundle().to_bytes().unwrap();
        bytes[8..12].copy_from_slice(&99u32.to_le_bytes());
        let err = Bundle::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let bytes = sample_bundle().to_bytes().unwrap();
        let err = Bundle::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, ChatError::Deserialize(_)));
    }

    #[test]
    fn test_mismatched_arrays_rejected() {
        let bundle = sample_bundle();
        let result = Bundle::new(
            bundle.index,
            bundle.encoder,
            bundle.sentences,
            vec!["only one".to_string()],
        );
        assert!(matches!(result, Err(ChatError::Deserialize(_))));
    }
}
