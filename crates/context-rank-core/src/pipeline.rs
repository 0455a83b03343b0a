//! One-shot ranking pipeline.
//!
//! Ties the stages together: load inputs, aggregate per-cluster weights,
//! predict labels for the new rows, join and sort, select the top-K
//! clusters, and emit the output files. Single-threaded, synchronous, no
//! state across runs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::emit::{write_ranked_table, write_top_k_spans, write_weight_table};
use crate::error::RankResult;
use crate::loader::{load_feature_rows, load_weights};
use crate::model::{CentroidModel, ClusterAssigner};
use crate::rank::{annotate, filter_top_k, sort_ranked, top_k_clusters};
use crate::weights::ClusterWeightTable;

/// Fixed output filename for the top-K span records, relative to the
/// working directory. The highlighting frontend looks for this name.
pub const TOP_K_SPANS_FILE: &str = "test.txt";

/// Suffix appended to the vectors path for the full ranked table.
pub const CLUSTERS_SUFFIX: &str = ".clusters";

/// Suffix appended to the vectors path for the aggregated weight dump.
pub const INFO_SUFFIX: &str = ".info";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Path to the feature-vector table.
    pub vectors: PathBuf,
    /// Path to the serialized clustering model artifact.
    pub model: PathBuf,
    /// Path to the per-sample weight array.
    pub weights: PathBuf,
    /// Number of top clusters to keep. Zero or negative selects nothing.
    pub top_k: i64,
    /// Also write the aggregated weight table next to the vectors file.
    pub emit_info: bool,
    /// Where the top-K span records go.
    pub spans_path: PathBuf,
}

impl RankConfig {
    /// Create a config with the standard output locations.
    pub fn new(
        vectors: impl Into<PathBuf>,
        model: impl Into<PathBuf>,
        weights: impl Into<PathBuf>,
        top_k: i64,
    ) -> Self {
        Self {
            vectors: vectors.into(),
            model: model.into(),
            weights: weights.into(),
            top_k,
            emit_info: false,
            spans_path: PathBuf::from(TOP_K_SPANS_FILE),
        }
    }

    /// Enable the aggregated weight dump.
    #[must_use]
    pub fn with_emit_info(mut self, emit_info: bool) -> Self {
        self.emit_info = emit_info;
        self
    }

    /// Redirect the span-record output (tests use this; the CLI keeps the
    /// fixed name).
    #[must_use]
    pub fn with_spans_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.spans_path = path.into();
        self
    }

    /// Path of the full ranked table: the vectors path plus `.clusters`.
    pub fn clusters_path(&self) -> PathBuf {
        append_suffix(&self.vectors, CLUSTERS_SUFFIX)
    }

    /// Path of the aggregated weight dump: the vectors path plus `.info`.
    pub fn info_path(&self) -> PathBuf {
        append_suffix(&self.vectors, INFO_SUFFIX)
    }
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankSummary {
    /// Rows read from the vector table (== rows in the full ranked dump).
    pub rows: usize,
    /// Distinct clusters in the aggregated weight table.
    pub known_clusters: usize,
    /// Cluster labels selected, heaviest first.
    pub selected_clusters: Vec<i64>,
    /// Rows written to the top-K span file.
    pub emitted_rows: usize,
}

/// Run the full pipeline.
///
/// # Errors
///
/// Propagates every loader, shape, and join error unrecovered; see
/// [`crate::error::RankError`]. Degenerate K is not an error.
pub fn run(config: &RankConfig) -> RankResult<RankSummary> {
    info!(
        vectors = %config.vectors.display(),
        model = %config.model.display(),
        top_k = config.top_k,
        "starting cluster ranking"
    );

    let rows = load_feature_rows(&config.vectors)?;
    let weights = load_weights(&config.weights)?;
    let model = CentroidModel::load(&config.model)?;

    let table = ClusterWeightTable::build(model.training_labels(), &weights)?;
    info!(
        clusters = table.len(),
        training_samples = model.training_labels().len(),
        "aggregated per-cluster weights"
    );

    let labels = model.predict(&rows)?;
    let mut annotated = annotate(&rows, &labels, &table)?;
    sort_ranked(&mut annotated);

    let k = usize::try_from(config.top_k).unwrap_or(0);
    let selected = top_k_clusters(&annotated, k);
    let filtered = filter_top_k(&annotated, &selected);

    write_ranked_table(config.clusters_path(), &annotated)?;
    write_top_k_spans(&config.spans_path, &filtered)?;
    if config.emit_info {
        write_weight_table(config.info_path(), &table)?;
    }

    let summary = RankSummary {
        rows: annotated.len(),
        known_clusters: table.len(),
        selected_clusters: selected,
        emitted_rows: filtered.len(),
    };

    info!(
        rows = summary.rows,
        selected = ?summary.selected_clusters,
        emitted = summary.emitted_rows,
        "cluster ranking complete"
    );
    Ok(summary)
}

/// Append a literal suffix to a path without touching its extension.
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}
