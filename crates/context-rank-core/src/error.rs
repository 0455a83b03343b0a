//! Error types for the ranking pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type RankResult<T> = Result<T, RankError>;

/// Errors that can occur while loading inputs or ranking clusters.
///
/// The pipeline is a one-shot batch job: every variant is fatal and
/// propagates to the caller unrecovered.
#[derive(Debug, Error)]
pub enum RankError {
    /// Input file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A delimited input file had a malformed line.
    #[error("Parse error in {} (line {line}): {message}", path.display())]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// 1-based line number of the offending line
        line: usize,
        /// Description of what's wrong with the line
        message: String,
    },

    /// The model artifact could not be decoded.
    #[error("Model artifact error: {0}")]
    Model(#[from] serde_json::Error),

    /// Training labels and weight array have different lengths.
    ///
    /// The two arrays are paired index-for-index; a mismatch means the
    /// artifacts come from different runs and the join would be garbage.
    #[error("Length mismatch: {labels} training labels vs {weights} weights")]
    LengthMismatch {
        /// Number of per-sample training labels
        labels: usize,
        /// Number of per-sample weights
        weights: usize,
    },

    /// Feature vector width doesn't match what the fitted model expects.
    #[error("Dimension mismatch: model expects {expected}, row has {actual}")]
    DimensionMismatch {
        /// Feature dimension the model was fitted on
        expected: usize,
        /// Actual dimension of the offending row
        actual: usize,
    },

    /// The model artifact decoded but is internally inconsistent.
    #[error("Invalid model artifact: {message}")]
    InvalidArtifact {
        /// Description of what's wrong with the artifact
        message: String,
    },

    /// A predicted cluster label never appeared in the fitted assignment.
    ///
    /// Indicates a model/data inconsistency that must not be silently
    /// masked.
    #[error("Cluster {label} has no entry in the weight table")]
    UnknownCluster {
        /// The unmatched cluster label
        label: i64,
    },
}

impl RankError {
    /// Create a Parse error.
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a LengthMismatch error.
    pub fn length_mismatch(labels: usize, weights: usize) -> Self {
        Self::LengthMismatch { labels, weights }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an InvalidArtifact error.
    pub fn invalid_artifact(message: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            message: message.into(),
        }
    }

    /// Create an UnknownCluster error.
    pub fn unknown_cluster(label: i64) -> Self {
        Self::UnknownCluster { label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let errors: Vec<RankError> = vec![
            RankError::parse("vectors.csv", 7, "expected 6 columns, got 5"),
            RankError::length_mismatch(100, 99),
            RankError::dimension_mismatch(128, 64),
            RankError::unknown_cluster(42),
        ];

        let expected_substrings = [
            "line 7",
            "100 training labels vs 99 weights",
            "expects 128",
            "Cluster 42",
        ];

        for (err, expected) in errors.iter().zip(expected_substrings.iter()) {
            let display = err.to_string();
            assert!(
                display.contains(expected),
                "Display for {:?} should contain '{}', got: {}",
                err,
                expected,
                display
            );
        }

        println!("[PASS] test_error_display_messages - all variants render");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: RankError = io.into();
        assert!(matches!(err, RankError::Io(_)));
        assert!(err.to_string().contains("no such file"));

        println!("[PASS] test_io_error_conversion");
    }
}
