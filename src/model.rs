//! Brute-force nearest-neighbour model fit over pivot-table rows.
//!
//! Row `i` of the model is row `i` of the pivot table it was fit against.
//! The indices returned by [`NearestNeighbors::kneighbors`] are positions in
//! that ordering, so the model and pivot table must always be shipped together.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::{RecommenderError, Result};
use crate::vector::RatingVector;

/// A fitted neighbour model that computes the distance to every stored row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestNeighbors {
    rows: Vec<RatingVector>,
    metric: DistanceMetric,
}

impl NearestNeighbors {
    /// Fit the model over `rows`. All rows must share one dimension.
    pub fn fit(rows: Vec<RatingVector>, metric: DistanceMetric) -> Result<Self> {
        if let Some(first) = rows.first() {
            if let Some(bad) = rows.iter().find(|r| !r.has_same_dimension(first)) {
                return Err(RecommenderError::InvalidData(format!(
                    "Dimension mismatch: expected {}, got {}",
                    first.dimension(),
                    bad.dimension()
                )));
            }
        }
        Ok(Self { rows, metric })
    }

    /// Return up to `k` `(row index, distance)` pairs closest to `query`,
    /// sorted by distance ascending. Equal distances keep the lower index first.
    pub fn kneighbors(&self, query: &RatingVector, k: usize) -> Result<Vec<(usize, f32)>> {
        let mut results: Vec<(usize, f32)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| Ok((i, self.metric.distance(query, row)?)))
            .collect::<Result<Vec<_>>>()?;

        results.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        results.truncate(k);
        Ok(results)
    }

    /// The distance metric the model was fit with.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Number of rows the model was fit over.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of users per row, `0` for an empty model.
    pub fn dimension(&self) -> usize {
        self.rows.first().map_or(0, RatingVector::dimension)
    }
}
