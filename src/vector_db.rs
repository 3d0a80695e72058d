use crate::error::{ChatError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Label reported for result slots that have no neighbour.
pub const MISSING_LABEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Squared Euclidean distance, smaller is closer
    L2,
    /// Dot product, larger is closer
    InnerProduct,
}

impl Metric {
    fn score(self, a: &ArrayView1<f32>, b: &ArrayView1<f32>) -> f32 {
        match self {
            Metric::L2 => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum(),
            Metric::InnerProduct => a.dot(b),
        }
    }

    /// Total order over scores; callers map NaN to [`Metric::worst`] first.
    fn rank(self, a: f32, b: f32) -> Ordering {
        let ord = a.total_cmp(&b);
        match self {
            Metric::L2 => ord,
            Metric::InnerProduct => ord.reverse(),
        }
    }

    fn worst(self) -> f32 {
        match self {
            Metric::L2 => f32::INFINITY,
            Metric::InnerProduct => f32::NEG_INFINITY,
        }
    }
}

/// Result of a batch search: one row per query, `k` columns.
#[derive(Debug, Clone)]
pub struct SearchOutput {
    pub distances: Array2<f32>,
    pub labels: Array2<i64>,
}

impl SearchOutput {
    pub fn shape(&self) -> (usize, usize) {
        self.labels.dim()
    }
}

/// Exhaustive nearest-neighbour index over a dense matrix of vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    metric: Metric,
    vectors: Array2<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize, metric: Metric) -> Self {
        FlatIndex {
            metric,
            vectors: Array2::zeros((0, dimension)),
        }
    }

    pub fn add(&mut self, vectors: ArrayView2<f32>) -> Result<()> {
        if vectors.ncols() != self.dimension() {
            return Err(ChatError::search(format!(
                "cannot add vectors of dimension {} to an index of dimension {}",
                vectors.ncols(),
                self.dimension()
            )));
        }
        self.vectors
            .append(Axis(0), vectors)
            .map_err(|e| ChatError::search(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Find the `k` nearest stored vectors for every row of `queries`.
    ///
    /// Slots beyond the number of stored vectors carry [`MISSING_LABEL`].
    /// Stored vectors scoring NaN rank last; a non-finite query is an error.
    pub fn search(&self, queries: ArrayView2<f32>, k: usize) -> Result<SearchOutput> {
        if k == 0 {
            return Err(ChatError::search("k must be at least 1"));
        }
        if queries.ncols() != self.dimension() {
            return Err(ChatError::search(format!(
                "query dimension {} does not match index dimension {}",
                queries.ncols(),
                self.dimension()
            )));
        }

        let n = queries.nrows();
        let mut distances = Array2::from_elem((n, k), self.metric.worst());
        let mut labels = Array2::from_elem((n, k), MISSING_LABEL);

        for (qi, query) in queries.outer_iter().enumerate() {
            if query.iter().any(|x| !x.is_finite()) {
                return Err(ChatError::search(format!(
                    "query {} contains non-finite values",
                    qi
                )));
            }

            let worst = self.metric.worst();
            let mut scored: Vec<(f32, usize)> = self
                .vectors
                .outer_iter()
                .enumerate()
                .map(|(i, v)| {
                    let score = self.metric.score(&query, &v);
                    (if score.is_nan() { worst } else { score }, i)
                })
                .collect();

            scored.sort_by(|a, b| self.metric.rank(a.0, b.0).then(a.1.cmp(&b.1)));

            for (slot, (score, idx)) in scored.into_iter().take(k).enumerate() {
                distances[[qi, slot]] = score;
                labels[[qi, slot]] = idx as i64;
            }
        }

        Ok(SearchOutput { distances, labels })
    }
}
