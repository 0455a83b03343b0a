//! Cluster ranking and top-K span selection for code-context vectors.
//!
//! Post-processing stage of an error-detection pipeline: a clustering
//! model fitted elsewhere is applied to new context vectors, each
//! predicted cluster is scored with the maximum weight of the original
//! training samples assigned to it, and the token spans of the K
//! heaviest clusters are emitted for highlighting.
//!
//! # Pipeline
//!
//! 1. [`loader`] reads the vector table and the weight array;
//!    [`model::CentroidModel::load`] reads the fitted artifact.
//! 2. [`weights::ClusterWeightTable`] aggregates max weight per cluster.
//! 3. [`model::ClusterAssigner::predict`] labels the new rows.
//! 4. [`rank::annotate`] joins weights onto rows; [`rank::sort_ranked`]
//!    orders them weight-descending (stable).
//! 5. [`rank::top_k_clusters`] / [`rank::filter_top_k`] select the spans.
//! 6. [`emit`] writes the ranked table and the span records.
//!
//! [`pipeline::run`] performs all of the above in one shot. Everything is
//! fail-fast: the first malformed input, shape mismatch, or unknown
//! cluster label aborts the run.

pub mod emit;
pub mod error;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod span;
pub mod weights;

pub use error::{RankError, RankResult};
pub use model::{CentroidModel, ClusterAssigner};
pub use pipeline::{run, RankConfig, RankSummary};
pub use rank::AnnotatedRow;
pub use span::{FeatureRow, TokenSpan};
pub use weights::ClusterWeightTable;
