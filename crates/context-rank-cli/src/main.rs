//! Cluster ranking CLI.
//!
//! Applies a fitted clustering model to new code-context vectors, ranks
//! the clusters by the maximum weight of their original training samples,
//! and writes the token spans of the top-K clusters for the highlighting
//! frontend.
//!
//! # Usage
//!
//! ```bash
//! context-rank \
//!     --vectors data/contexts.csv \
//!     --model data/model.json \
//!     --solutions_pt data/solutions.pt \
//!     --top_k_clusters 5
//! ```
//!
//! Outputs: `<vectors>.clusters` (full ranked table) and `test.txt`
//! (top-K span records, working directory). `--emit-info` additionally
//! writes `<vectors>.info` with the aggregated per-cluster weights.
//!
//! Any I/O, parse, shape, or unknown-cluster error aborts the run with a
//! non-zero exit status; there is nothing to recover in a one-shot batch
//! job.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use context_rank_core::pipeline::{run, RankConfig};

/// Rank context-vector clusters and emit top-K error spans.
#[derive(Parser, Debug)]
#[command(name = "context-rank")]
#[command(about = "Rank precomputed clusters of code-context vectors by solution weight")]
struct Args {
    /// Path to the feature-vector table (CSV: 4 span columns + features).
    #[arg(short = 'v', long)]
    vectors: PathBuf,

    /// Path to the serialized clustering model artifact (JSON).
    #[arg(short = 'm', long, alias = "mod")]
    model: PathBuf,

    /// Path to the whitespace-delimited per-sample weight array.
    #[arg(short = 'p', long, alias = "solutions_pt")]
    solutions_pt: PathBuf,

    /// Number of top clusters to keep (<= 0 selects nothing).
    #[arg(short = 'k', long, alias = "top_k_clusters")]
    top_k_clusters: i64,

    /// Also write the aggregated cluster weight table (<vectors>.info).
    #[arg(long)]
    emit_info: bool,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = RankConfig::new(
        args.vectors,
        args.model,
        args.solutions_pt,
        args.top_k_clusters,
    )
    .with_emit_info(args.emit_info);

    let summary = run(&config)?;

    info!(
        rows = summary.rows,
        known_clusters = summary.known_clusters,
        selected = ?summary.selected_clusters,
        emitted = summary.emitted_rows,
        "done"
    );
    Ok(())
}
