use crate::bundle::Bundle;
use crate::error::Result;
use crate::response::{error_response, format_response};
use crate::vector_db::SearchOutput;
use ndarray::{Array2, Axis};

pub struct Retriever {
    bundle: Bundle,
}

impl Retriever {
    pub fn new(bundle: Bundle) -> Self {
        Retriever { bundle }
    }

    /// Encode the queries and look up their `top_k` neighbours.
    ///
    /// A single query is lifted to a one-row batch so the index always sees
    /// a `(queries, dimension)` matrix.
    pub fn search(&self, queries: &[&str], top_k: usize) -> Result<SearchOutput> {
        let embeddings: Array2<f32> = match queries {
            [query] => self.bundle.encoder.encode_one(query).insert_axis(Axis(0)),
            _ => self.bundle.encoder.encode(queries),
        };
        self.bundle.index.search(embeddings.view(), top_k)
    }

    /// One formatted answer per query. A failed search yields the error
    /// placeholder for every query in the batch instead of an error.
    pub fn answer(&self, queries: &[&str], top_k: usize) -> Vec<String> {
        let output = match self.search(queries, top_k) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                return queries.iter().map(|q| error_response(q)).collect();
            }
        };

        queries
            .iter()
            .zip(output.labels.outer_iter())
            .map(|(query, labels)| {
                format_response(
                    query,
                    &labels.to_vec(),
                    &self.bundle.sentences,
                    &self.bundle.summaries,
                )
            })
            .collect()
    }
}
