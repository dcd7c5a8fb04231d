//! Distance metrics between pivot rows

use crate::error::{RecommenderError, Result};
use crate::vector::RatingVector;
use serde::{Deserialize, Serialize};

/// Distance metrics the neighbour model can be fit with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceMetric {
    /// Euclidean (L2) distance
    #[default]
    Euclidean,
    /// Cosine similarity (converted to distance: 1 - similarity).
    /// A row with no ratings is at distance 1.0 from everything.
    Cosine,
}

impl DistanceMetric {
    /// Compute the distance between two rows using this metric
    pub fn distance(&self, v1: &RatingVector, v2: &RatingVector) -> Result<f32> {
        if !v1.has_same_dimension(v2) {
            return Err(RecommenderError::InvalidData(format!(
                "Dimension mismatch: expected {}, got {}",
                v1.dimension(),
                v2.dimension()
            )));
        }

        match self {
            DistanceMetric::Euclidean => Ok(euclidean_distance(v1, v2)),
            DistanceMetric::Cosine => Ok(cosine_distance(v1, v2)),
        }
    }
}

/// Compute Euclidean (L2) distance between two rows
pub fn euclidean_distance(v1: &RatingVector, v2: &RatingVector) -> f32 {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f32>()
        .sqrt()
}

/// Compute cosine distance between two rows (1 - cosine similarity)
pub fn cosine_distance(v1: &RatingVector, v2: &RatingVector) -> f32 {
    let norm1 = v1.norm();
    let norm2 = v2.norm();

    if norm1 == 0.0 || norm2 == 0.0 {
        return 1.0;
    }

    let similarity = dot_product(v1, v2) / (norm1 * norm2);

    // Clamp to [-1, 1] to handle floating point errors
    1.0 - similarity.clamp(-1.0, 1.0)
}

/// Compute dot product of two rows
pub fn dot_product(v1: &RatingVector, v2: &RatingVector) -> f32 {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(a, b)| a * b)
        .sum()
}
