//! Input loaders for the ranking pipeline.
//!
//! Two formats, both plain text: the vector table is comma-delimited with a
//! header row (4 token-span columns followed by the feature columns), and
//! the weight file is whitespace-delimited floats, one per original
//! training sample.

use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{RankError, RankResult};
use crate::span::{FeatureRow, TokenSpan};

/// Number of leading metadata columns in the vector table.
pub const SPAN_COLUMNS: usize = 4;

/// Load the feature-vector table.
///
/// The first line is a header and is skipped; every following line must
/// carry the 4 span columns plus a consistent number of feature columns.
/// Blank trailing lines are ignored.
///
/// # Errors
///
/// Returns `RankError::Io` if the file cannot be opened and
/// `RankError::Parse` (with the 1-based line number) on any malformed
/// line, missing header, or ragged feature width.
pub fn load_feature_rows(path: impl AsRef<Path>) -> RankResult<Vec<FeatureRow>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines().enumerate();

    match lines.next() {
        Some((_, header)) => {
            header?;
        }
        None => return Err(RankError::parse(path, 1, "empty file, expected header")),
    }

    let mut rows: Vec<FeatureRow> = Vec::new();
    let mut feature_dim: Option<usize> = None;

    for (idx, line) in lines {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < SPAN_COLUMNS {
            return Err(RankError::parse(
                path,
                line_no,
                format!("expected at least {} columns, got {}", SPAN_COLUMNS, fields.len()),
            ));
        }

        let mut spans = [0u64; SPAN_COLUMNS];
        for (i, field) in fields[..SPAN_COLUMNS].iter().enumerate() {
            spans[i] = field.trim().parse::<u64>().map_err(|e| {
                RankError::parse(path, line_no, format!("bad span offset '{}': {}", field, e))
            })?;
        }

        let features = fields[SPAN_COLUMNS..]
            .iter()
            .map(|field| {
                field.trim().parse::<f32>().map_err(|e| {
                    RankError::parse(path, line_no, format!("bad feature '{}': {}", field, e))
                })
            })
            .collect::<RankResult<Vec<f32>>>()?;

        match feature_dim {
            None => feature_dim = Some(features.len()),
            Some(dim) if dim != features.len() => {
                return Err(RankError::parse(
                    path,
                    line_no,
                    format!("row has {} feature columns, expected {}", features.len(), dim),
                ));
            }
            Some(_) => {}
        }

        rows.push(FeatureRow::new(
            TokenSpan::new(spans[0], spans[1]),
            TokenSpan::new(spans[2], spans[3]),
            features,
        ));
    }

    info!(
        rows = rows.len(),
        dim = feature_dim.unwrap_or(0),
        path = %path.display(),
        "loaded feature-vector table"
    );
    Ok(rows)
}

/// Load the per-sample weight array.
///
/// Any run of whitespace (spaces, tabs, newlines) separates values, so
/// both one-per-line and single-line layouts parse.
///
/// # Errors
///
/// Returns `RankError::Io` if the file cannot be read and
/// `RankError::Parse` on any token that is not a float.
pub fn load_weights(path: impl AsRef<Path>) -> RankResult<Vec<f64>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut weights: Vec<f64> = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        for token in line.split_whitespace() {
            let weight = token.parse::<f64>().map_err(|e| {
                RankError::parse(path, idx + 1, format!("bad weight '{}': {}", token, e))
            })?;
            weights.push(weight);
        }
    }

    info!(weights = weights.len(), path = %path.display(), "loaded weight array");
    Ok(weights)
}
