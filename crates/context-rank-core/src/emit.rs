//! Output writers.
//!
//! Three artifacts: the full ranked table (CSV with header), the filtered
//! top-K span records (space-delimited, no header, consumed by the
//! highlighting frontend), and the optional aggregated weight dump.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::RankResult;
use crate::rank::AnnotatedRow;
use crate::weights::ClusterWeightTable;

/// Header of the full ranked table.
pub const RANKED_HEADER: &str =
    "TOKEN1_START_BYTE,TOKEN1_END_BYTE,TOKEN2_START_BYTE,TOKEN2_END_BYTE,CLUSTER,WEIGHT";

/// Header of the aggregated weight dump.
pub const WEIGHT_TABLE_HEADER: &str = "CLUSTER,WEIGHT";

/// Write the full ranked table as CSV, one line per annotated row, in the
/// order given (weight descending after [`crate::rank::sort_ranked`]).
pub fn write_ranked_table(path: impl AsRef<Path>, rows: &[AnnotatedRow]) -> RankResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{}", RANKED_HEADER)?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            row.token1.start_byte,
            row.token1.end_byte,
            row.token2.start_byte,
            row.token2.end_byte,
            row.cluster,
            row.weight
        )?;
    }
    out.flush()?;

    info!(rows = rows.len(), path = %path.display(), "wrote ranked table");
    Ok(())
}

/// Write the filtered top-K span records: 4 span columns plus the cluster
/// label, space-delimited, no header, sorted order preserved.
pub fn write_top_k_spans(path: impl AsRef<Path>, rows: &[AnnotatedRow]) -> RankResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    for row in rows {
        writeln!(
            out,
            "{} {} {} {} {}",
            row.token1.start_byte,
            row.token1.end_byte,
            row.token2.start_byte,
            row.token2.end_byte,
            row.cluster
        )?;
    }
    out.flush()?;

    info!(rows = rows.len(), path = %path.display(), "wrote top-k span records");
    Ok(())
}

/// Write the aggregated cluster weight table, weight descending.
pub fn write_weight_table(path: impl AsRef<Path>, table: &ClusterWeightTable) -> RankResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{}", WEIGHT_TABLE_HEADER)?;
    for entry in table.entries() {
        writeln!(out, "{},{}", entry.cluster, entry.weight)?;
    }
    out.flush()?;

    info!(clusters = table.len(), path = %path.display(), "wrote weight table");
    Ok(())
}
