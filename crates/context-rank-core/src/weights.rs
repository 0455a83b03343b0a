//! Per-cluster weight aggregation.
//!
//! The weight array scores each original training sample; the fitted model
//! memorizes each sample's cluster label. Joining the two index-for-index
//! and taking the per-cluster maximum yields the table that ranks clusters.
//!
//! The original tool relied on the two arrays lining up implicitly. Here the
//! pairing is an explicit precondition: construction fails when the lengths
//! differ.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, RankResult};

/// One row of the aggregated weight dump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterWeightEntry {
    /// Cluster label.
    pub cluster: i64,
    /// Maximum weight among training samples assigned to the cluster.
    pub weight: f64,
}

/// Mapping from cluster label to the maximum weight observed among the
/// original training samples assigned to that cluster.
///
/// Derived once from the fitted labels and the external weight array;
/// lookups are by label, so presentation order never affects correctness.
///
/// # Example
///
/// ```
/// use context_rank_core::weights::ClusterWeightTable;
///
/// let table = ClusterWeightTable::build(
///     &[0, 0, 1, 1, 2],
///     &[1.0, 3.0, 2.0, 2.0, 5.0],
/// ).unwrap();
///
/// assert_eq!(table.get(0), Some(3.0));
/// assert_eq!(table.get(2), Some(5.0));
/// assert_eq!(table.get(9), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterWeightTable {
    max_weight: HashMap<i64, f64>,
}

impl ClusterWeightTable {
    /// Aggregate per-sample weights into per-cluster maxima.
    ///
    /// # Arguments
    ///
    /// * `labels` - per-training-sample cluster labels, in training order
    /// * `weights` - per-training-sample weights, paired index-for-index
    ///
    /// # Errors
    ///
    /// Returns `RankError::LengthMismatch` if the slices differ in length.
    pub fn build(labels: &[i64], weights: &[f64]) -> RankResult<Self> {
        if labels.len() != weights.len() {
            return Err(RankError::length_mismatch(labels.len(), weights.len()));
        }

        let mut max_weight: HashMap<i64, f64> = HashMap::new();
        for (&label, &weight) in labels.iter().zip(weights.iter()) {
            max_weight
                .entry(label)
                .and_modify(|w| {
                    if weight > *w {
                        *w = weight;
                    }
                })
                .or_insert(weight);
        }

        Ok(Self { max_weight })
    }

    /// Maximum weight for a cluster, if the cluster was seen at fit time.
    pub fn get(&self, label: i64) -> Option<f64> {
        self.max_weight.get(&label).copied()
    }

    /// Maximum weight for a cluster, failing on unknown labels.
    ///
    /// # Errors
    ///
    /// Returns `RankError::UnknownCluster` if the label never appeared in
    /// the fitted assignment.
    pub fn lookup(&self, label: i64) -> RankResult<f64> {
        self.get(label)
            .ok_or_else(|| RankError::unknown_cluster(label))
    }

    /// Number of distinct clusters in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.max_weight.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_weight.is_empty()
    }

    /// Entries ordered by weight descending, label ascending on ties.
    ///
    /// Presentation order for the aggregated dump; lookups don't use it.
    pub fn entries(&self) -> Vec<ClusterWeightEntry> {
        let mut entries: Vec<ClusterWeightEntry> = self
            .max_weight
            .iter()
            .map(|(&cluster, &weight)| ClusterWeightEntry { cluster, weight })
            .collect();
        entries.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.cluster.cmp(&b.cluster))
        });
        entries
    }
}
