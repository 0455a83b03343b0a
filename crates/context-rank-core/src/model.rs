//! Fitted clustering model artifact.
//!
//! The clustering model is trained elsewhere; this crate only loads the
//! serialized artifact and applies it to new feature vectors. The artifact
//! carries two things: the per-cluster centroids (enough to reproduce
//! `predict` for a fitted centroid-based model) and the memorized
//! per-training-sample labels, which downstream code pairs with the
//! external weight array.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, RankResult};
use crate::span::FeatureRow;

/// Capability interface of a fitted clustering assignment function.
///
/// One predict method over arbitrary feature matrices, one accessor for
/// the training-time labels. No training surface.
pub trait ClusterAssigner {
    /// Assign a cluster label to every row, same count and order as input.
    ///
    /// # Errors
    ///
    /// Returns `RankError::DimensionMismatch` if any row's feature vector
    /// width differs from what the model was fitted on.
    fn predict(&self, rows: &[FeatureRow]) -> RankResult<Vec<i64>>;

    /// Per-training-sample cluster labels memorized at fit time.
    fn training_labels(&self) -> &[i64];
}

/// Fitted nearest-centroid clustering model, persisted as JSON.
///
/// Cluster label k is the index of the k-th centroid, matching the
/// labeling convention of the tool that fitted the model.
///
/// # Example
///
/// ```
/// use context_rank_core::model::{CentroidModel, ClusterAssigner};
/// use context_rank_core::span::{FeatureRow, TokenSpan};
///
/// let model = CentroidModel::new(
///     vec![vec![0.0, 0.0], vec![10.0, 10.0]],
///     vec![0, 0, 1],
/// ).unwrap();
///
/// let row = FeatureRow::new(TokenSpan::new(0, 1), TokenSpan::new(2, 3), vec![9.0, 9.5]);
/// let labels = model.predict(&[row]).unwrap();
/// assert_eq!(labels, vec![1]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentroidModel {
    /// Cluster centroids; index == cluster label.
    centroids: Vec<Vec<f32>>,

    /// Cluster labels of the original training samples, in training order.
    training_labels: Vec<i64>,
}

impl CentroidModel {
    /// Create a model from centroids and memorized training labels.
    ///
    /// # Errors
    ///
    /// Returns `RankError::InvalidArtifact` if there are no centroids or
    /// the centroids disagree on dimensionality.
    pub fn new(centroids: Vec<Vec<f32>>, training_labels: Vec<i64>) -> RankResult<Self> {
        let model = Self {
            centroids,
            training_labels,
        };
        model.validate()?;
        Ok(model)
    }

    /// Feature dimension the model was fitted on.
    pub fn dim(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    /// Number of clusters known to the fitted model.
    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }

    /// Validate internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `RankError::InvalidArtifact` if the artifact cannot be used
    /// for prediction.
    pub fn validate(&self) -> RankResult<()> {
        if self.centroids.is_empty() {
            return Err(RankError::invalid_artifact("artifact has no centroids"));
        }
        let dim = self.centroids[0].len();
        if dim == 0 {
            return Err(RankError::invalid_artifact("centroids have zero width"));
        }
        if let Some(bad) = self.centroids.iter().position(|c| c.len() != dim) {
            return Err(RankError::invalid_artifact(format!(
                "centroid {} has width {}, expected {}",
                bad,
                self.centroids[bad].len(),
                dim
            )));
        }
        Ok(())
    }

    /// Serialize the model to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `RankError::Model` if JSON encoding fails.
    pub fn to_bytes(&self) -> RankResult<Vec<u8>> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }

    /// Deserialize a model from JSON bytes and validate it.
    ///
    /// # Errors
    ///
    /// Returns `RankError::Model` on decode failure, or
    /// `RankError::InvalidArtifact` if the decoded artifact is unusable.
    pub fn from_bytes(bytes: &[u8]) -> RankResult<Self> {
        let model: Self = serde_json::from_slice(bytes)?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from a file.
    ///
    /// # Errors
    ///
    /// Returns `RankError::Io` if the file cannot be read, otherwise the
    /// errors of [`CentroidModel::from_bytes`].
    pub fn load(path: impl AsRef<Path>) -> RankResult<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl ClusterAssigner for CentroidModel {
    fn predict(&self, rows: &[FeatureRow]) -> RankResult<Vec<i64>> {
        let dim = self.dim();
        let mut labels = Vec::with_capacity(rows.len());

        for row in rows {
            if row.dim() != dim {
                return Err(RankError::dimension_mismatch(dim, row.dim()));
            }

            let mut min_dist = f32::MAX;
            let mut best = 0usize;
            for (k, centroid) in self.centroids.iter().enumerate() {
                let dist = euclidean_distance_squared(&row.features, centroid);
                if dist < min_dist {
                    min_dist = dist;
                    best = k;
                }
            }
            labels.push(best as i64);
        }

        Ok(labels)
    }

    fn training_labels(&self) -> &[i64] {
        &self.training_labels
    }
}

/// Squared Euclidean distance between two equal-length vectors.
#[inline]
fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::TokenSpan;

    fn row(features: Vec<f32>) -> FeatureRow {
        FeatureRow::new(TokenSpan::new(0, 1), TokenSpan::new(2, 3), features)
    }

    fn two_cluster_model() -> CentroidModel {
        CentroidModel::new(vec![vec![0.0, 0.0], vec![10.0, 10.0]], vec![0, 0, 1, 1]).unwrap()
    }

    #[test]
    fn test_predict_nearest_centroid() {
        let model = two_cluster_model();
        let labels = model
            .predict(&[
                row(vec![1.0, -1.0]),
                row(vec![9.0, 11.0]),
                row(vec![4.9, 4.9]),
            ])
            .expect("predict");

        assert_eq!(labels, vec![0, 1, 0]);

        println!("[PASS] test_predict_nearest_centroid - labels={:?}", labels);
    }

    #[test]
    fn test_predict_preserves_row_order_and_count() {
        let model = two_cluster_model();
        let rows: Vec<FeatureRow> = (0..10).map(|i| row(vec![i as f32, i as f32])).collect();
        let labels = model.predict(&rows).expect("predict");

        assert_eq!(labels.len(), rows.len());
        // rows below the midpoint go to centroid 0, above to centroid 1
        assert_eq!(labels[0], 0);
        assert_eq!(labels[9], 1);

        println!("[PASS] test_predict_preserves_row_order_and_count");
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let model = two_cluster_model();
        let result = model.predict(&[row(vec![1.0, 2.0, 3.0])]);

        match result {
            Err(RankError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }

        println!("[PASS] test_predict_dimension_mismatch");
    }

    #[test]
    fn test_empty_artifact_rejected() {
        let result = CentroidModel::new(vec![], vec![0, 1]);
        assert!(matches!(result, Err(RankError::InvalidArtifact { .. })));

        let ragged = CentroidModel::new(vec![vec![0.0, 0.0], vec![1.0]], vec![]);
        assert!(matches!(ragged, Err(RankError::InvalidArtifact { .. })));

        println!("[PASS] test_empty_artifact_rejected");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let model = two_cluster_model();
        let bytes = model.to_bytes().expect("serialize");
        let restored = CentroidModel::from_bytes(&bytes).expect("deserialize");

        assert_eq!(restored.cluster_count(), 2);
        assert_eq!(restored.dim(), 2);
        assert_eq!(restored.training_labels(), model.training_labels());

        println!("[PASS] test_serialization_roundtrip");
    }

    #[test]
    fn test_from_bytes_invalid_json() {
        let result = CentroidModel::from_bytes(b"not a model");
        assert!(matches!(result, Err(RankError::Model(_))));

        println!("[PASS] test_from_bytes_invalid_json");
    }
}
