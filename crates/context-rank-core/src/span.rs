//! Token span and feature row types.

use serde::{Deserialize, Serialize};

/// Byte range of a single code token.
///
/// Spans come from the extractor as (start, end) byte offsets into the
/// source file and are carried through the pipeline untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    /// Offset of the token's first byte.
    pub start_byte: u64,
    /// Offset one past the token's last byte.
    pub end_byte: u64,
}

impl TokenSpan {
    /// Create a new span.
    pub fn new(start_byte: u64, end_byte: u64) -> Self {
        Self {
            start_byte,
            end_byte,
        }
    }

    /// Length of the span in bytes (0 for an empty or inverted span).
    #[inline]
    pub fn len_bytes(&self) -> u64 {
        self.end_byte.saturating_sub(self.start_byte)
    }
}

/// One new sample to classify: two token spans plus the context
/// feature vector extracted for the token pair.
///
/// Immutable once loaded; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Span of the first token of the pair.
    pub token1: TokenSpan,
    /// Span of the second token of the pair.
    pub token2: TokenSpan,
    /// Context feature vector (everything after the 4 span columns).
    pub features: Vec<f32>,
}

impl FeatureRow {
    /// Create a new feature row.
    pub fn new(token1: TokenSpan, token2: TokenSpan, features: Vec<f32>) -> Self {
        Self {
            token1,
            token2,
            features,
        }
    }

    /// Feature vector dimensionality.
    #[inline]
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        assert_eq!(TokenSpan::new(10, 14).len_bytes(), 4);
        assert_eq!(TokenSpan::new(5, 5).len_bytes(), 0);
        // inverted spans don't underflow
        assert_eq!(TokenSpan::new(14, 10).len_bytes(), 0);

        println!("[PASS] test_span_len");
    }

    #[test]
    fn test_feature_row_dim() {
        let row = FeatureRow::new(
            TokenSpan::new(0, 3),
            TokenSpan::new(8, 12),
            vec![0.5, -1.0, 2.0],
        );
        assert_eq!(row.dim(), 3);
        assert_eq!(row.token2.start_byte, 8);

        println!("[PASS] test_feature_row_dim - dim={}", row.dim());
    }
}
