//! Weight join, ranking, and top-K cluster selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RankError, RankResult};
use crate::span::{FeatureRow, TokenSpan};
use crate::weights::ClusterWeightTable;

/// A feature row annotated with its predicted cluster and the cluster's
/// aggregated weight. The central working record of the pipeline: built
/// once by [`annotate`], ordered once by [`sort_ranked`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// Span of the first token of the pair.
    pub token1: TokenSpan,
    /// Span of the second token of the pair.
    pub token2: TokenSpan,
    /// Predicted cluster label.
    pub cluster: i64,
    /// Aggregated weight of the predicted cluster.
    pub weight: f64,
}

/// Attach cluster labels and looked-up weights to feature rows.
///
/// Output preserves input row order. Feature vectors are dropped here;
/// only the span metadata travels further down the pipeline.
///
/// # Errors
///
/// Returns `RankError::LengthMismatch` if `labels` wasn't produced for
/// exactly these rows, and `RankError::UnknownCluster` if a predicted
/// label has no entry in the weight table — a model/data inconsistency
/// that is fatal by design.
pub fn annotate(
    rows: &[FeatureRow],
    labels: &[i64],
    table: &ClusterWeightTable,
) -> RankResult<Vec<AnnotatedRow>> {
    if rows.len() != labels.len() {
        return Err(RankError::length_mismatch(labels.len(), rows.len()));
    }

    rows.iter()
        .zip(labels.iter())
        .map(|(row, &cluster)| {
            let weight = table.lookup(cluster)?;
            Ok(AnnotatedRow {
                token1: row.token1,
                token2: row.token2,
                cluster,
                weight,
            })
        })
        .collect()
}

/// Sort annotated rows by weight descending, stably.
///
/// Stability is load-bearing: rows with equal weight keep their original
/// relative order, which decides which cluster wins a tie in the top-K
/// selection.
pub fn sort_ranked(rows: &mut [AnnotatedRow]) {
    // Vec::sort_by is stable; total_cmp gives a deterministic order even
    // for non-finite weights.
    rows.sort_by(|a, b| b.weight.total_cmp(&a.weight));
}

/// First `k` distinct cluster labels in the order they appear in the
/// weight-descending sorted table.
///
/// Equivalent to ranking clusters by their single heaviest row. `k == 0`
/// selects nothing; fewer than `k` distinct labels selects them all.
pub fn top_k_clusters(sorted: &[AnnotatedRow], k: usize) -> Vec<i64> {
    let mut selected: Vec<i64> = Vec::new();
    for row in sorted {
        if selected.len() == k {
            break;
        }
        if !selected.contains(&row.cluster) {
            selected.push(row.cluster);
        }
    }
    debug!(k, selected = ?selected, "top-k cluster selection");
    selected
}

/// Rows whose cluster is in the selected set, in sorted order.
///
/// Keeps every row of a selected cluster, not just its heaviest.
pub fn filter_top_k(sorted: &[AnnotatedRow], selected: &[i64]) -> Vec<AnnotatedRow> {
    sorted
        .iter()
        .filter(|row| selected.contains(&row.cluster))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_rows(n: usize) -> Vec<FeatureRow> {
        (0..n)
            .map(|i| {
                let base = (i * 10) as u64;
                FeatureRow::new(
                    TokenSpan::new(base, base + 2),
                    TokenSpan::new(base + 4, base + 6),
                    vec![i as f32],
                )
            })
            .collect()
    }

    fn worked_example() -> Vec<AnnotatedRow> {
        // OriginalAssignment = [0,0,1,1,2], WeightArray = [1,3,2,2,5]
        // => table {0:3, 1:2, 2:5}; new predictions [1,2,0,2]
        let table =
            ClusterWeightTable::build(&[0, 0, 1, 1, 2], &[1.0, 3.0, 2.0, 2.0, 5.0]).unwrap();
        let rows = feature_rows(4);
        let mut annotated = annotate(&rows, &[1, 2, 0, 2], &table).unwrap();
        sort_ranked(&mut annotated);
        annotated
    }

    #[test]
    fn test_annotate_joins_weights() {
        let table = ClusterWeightTable::build(&[0, 1], &[1.5, 4.0]).unwrap();
        let rows = feature_rows(3);
        let annotated = annotate(&rows, &[1, 0, 1], &table).expect("annotate");

        assert_eq!(annotated.len(), 3);
        assert_eq!(annotated[0].weight, 4.0);
        assert_eq!(annotated[1].weight, 1.5);
        assert_eq!(annotated[0].token1, rows[0].token1);

        println!("[PASS] test_annotate_joins_weights");
    }

    #[test]
    fn test_annotate_unknown_cluster_fails() {
        let table = ClusterWeightTable::build(&[0], &[1.0]).unwrap();
        let rows = feature_rows(1);
        let result = annotate(&rows, &[7], &table);

        assert!(matches!(result, Err(RankError::UnknownCluster { label: 7 })));

        println!("[PASS] test_annotate_unknown_cluster_fails");
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let table = ClusterWeightTable::build(&[0, 1, 2], &[5.0, 5.0, 1.0]).unwrap();
        let rows = feature_rows(4);
        let mut annotated = annotate(&rows, &[1, 0, 2, 0], &table).unwrap();
        sort_ranked(&mut annotated);

        // rows 0, 1, 3 all weigh 5.0; their original relative order holds
        let clusters: Vec<i64> = annotated.iter().map(|r| r.cluster).collect();
        assert_eq!(clusters, vec![1, 0, 0, 2]);
        assert_eq!(annotated[0].token1.start_byte, 0);
        assert_eq!(annotated[1].token1.start_byte, 10);
        assert_eq!(annotated[2].token1.start_byte, 30);

        println!("[PASS] test_sort_is_stable_on_ties - order={:?}", clusters);
    }

    #[test]
    fn test_worked_example_top_2() {
        let sorted = worked_example();

        // weights [2,5,3,5] sorted desc => clusters [2,2,0,1]
        let clusters: Vec<i64> = sorted.iter().map(|r| r.cluster).collect();
        assert_eq!(clusters, vec![2, 2, 0, 1]);

        let selected = top_k_clusters(&sorted, 2);
        assert_eq!(selected, vec![2, 0]);

        let filtered = filter_top_k(&sorted, &selected);
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|r| r.cluster != 1));

        println!("[PASS] test_worked_example_top_2 - selected={:?}", selected);
    }

    #[test]
    fn test_top_k_zero_selects_nothing() {
        let sorted = worked_example();
        assert!(top_k_clusters(&sorted, 0).is_empty());
        assert!(filter_top_k(&sorted, &[]).is_empty());

        println!("[PASS] test_top_k_zero_selects_nothing");
    }

    #[test]
    fn test_top_k_exceeding_distinct_selects_all() {
        let sorted = worked_example();
        let selected = top_k_clusters(&sorted, 100);

        assert_eq!(selected, vec![2, 0, 1]);
        assert_eq!(filter_top_k(&sorted, &selected).len(), sorted.len());

        println!("[PASS] test_top_k_exceeding_distinct_selects_all");
    }

    #[test]
    fn test_selection_size_is_min_of_k_and_distinct() {
        let sorted = worked_example(); // 3 distinct clusters
        for k in 1..=5 {
            let selected = top_k_clusters(&sorted, k);
            assert_eq!(selected.len(), k.min(3), "k={}", k);
        }

        println!("[PASS] test_selection_size_is_min_of_k_and_distinct");
    }

    #[test]
    fn test_annotate_label_count_mismatch() {
        let table = ClusterWeightTable::build(&[0], &[1.0]).unwrap();
        let rows = feature_rows(2);
        let result = annotate(&rows, &[0], &table);

        assert!(matches!(result, Err(RankError::LengthMismatch { .. })));

        println!("[PASS] test_annotate_label_count_mismatch");
    }
}
