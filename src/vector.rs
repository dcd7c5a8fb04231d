//! Rating vectors: one pivot-table row, one entry per user

use serde::{Deserialize, Serialize};

/// A dense row of ratings. Users who did not rate the book hold `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingVector {
    data: Vec<f32>,
}

impl RatingVector {
    /// Create a new rating vector from a Vec<f32>
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// A row with no ratings at all.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            data: vec![0.0; dimension],
        }
    }

    /// Get the dimension (number of users) of the vector
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Set the rating at `user_pos`. Out-of-range positions are ignored.
    pub fn set(&mut self, user_pos: usize, rating: f32) {
        if let Some(slot) = self.data.get_mut(user_pos) {
            *slot = rating;
        }
    }

    /// Check if this vector has the same dimension as another
    pub fn has_same_dimension(&self, other: &RatingVector) -> bool {
        self.dimension() == other.dimension()
    }

    /// Compute the L2 norm (magnitude) of the vector
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_creation() {
        let v = RatingVector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_vector_norm() {
        let v = RatingVector::new(vec![3.0, 4.0]);
        assert_relative_eq!(v.norm(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_set_ignores_out_of_range() {
        let mut v = RatingVector::zeros(4);
        v.set(1, 8.0);
        v.set(3, 5.0);
        v.set(10, 9.0);
        assert_eq!(v.as_slice(), &[0.0, 8.0, 0.0, 5.0]);
    }
}
