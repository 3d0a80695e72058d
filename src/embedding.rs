//! Static sentence embeddings.
//!
//! Every vocabulary token owns one row of the embedding matrix; a sentence is
//! encoded as the mean of its known tokens' rows.

use crate::error::{ChatError, Result};
use lazy_static::lazy_static;
use ndarray::{Array1, Array2};
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceEncoder {
    vocab: FxHashMap<String, usize>,
    embeddings: Array2<f32>,
    normalize: bool,
}

impl SentenceEncoder {
    pub fn new(
        vocab: FxHashMap<String, usize>,
        embeddings: Array2<f32>,
        normalize: bool,
    ) -> Result<Self> {
        let encoder = SentenceEncoder {
            vocab,
            embeddings,
            normalize,
        };
        encoder.validate()?;
        Ok(encoder)
    }

    /// Check that every vocabulary entry points at a row of the matrix.
    pub fn validate(&self) -> Result<()> {
        let rows = self.embeddings.nrows();
        if let Some((token, id)) = self.vocab.iter().find(|&(_, &id)| id >= rows) {
            return Err(ChatError::deserialize(format!(
                "token '{}' maps to row {} but the embedding matrix has {} rows",
                token, id, rows
            )));
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.embeddings.ncols()
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    pub fn tokenize(text: &str) -> Vec<String> {
        let text = text.nfc().collect::<String>().to_lowercase();
        let text = PUNCTUATION.replace_all(&text, " ");

        text.split_whitespace()
            .map(|token| token.to_string())
            .collect()
    }

    /// Encode one text. Text without known tokens encodes to the zero vector.
    pub fn encode_one(&self, text: &str) -> Array1<f32> {
        let mut sum = Array1::<f32>::zeros(self.dimension());
        let mut count = 0usize;

        for token in Self::tokenize(text) {
            match self.vocab.get(&token) {
                Some(&id) if id < self.embeddings.nrows() => {
                    sum += &self.embeddings.row(id);
                    count += 1;
                }
                _ => {}
            }
        }

        if count == 0 {
            return sum;
        }
        sum /= count as f32;

        if self.normalize {
            let norm = sum.dot(&sum).sqrt();
            if norm > 0.0 {
                sum /= norm;
            }
        }
        sum
    }

    /// Encode a batch of texts into a `(texts.len(), dimension)` matrix.
    pub fn encode(&self, texts: &[&str]) -> Array2<f32> {
        let mut out = Array2::zeros((texts.len(), self.dimension()));
        for (i, text) in texts.iter().enumerate() {
            out.row_mut(i).assign(&self.encode_one(text));
        }
        out
    }
}
