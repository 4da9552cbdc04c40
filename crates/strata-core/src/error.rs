//! Error types for strata-core operations.
//!
//! Covers the failure modes of layer buffers and regions:
//! - Buffer construction (data length)
//! - Region bounds checking
//! - Geometry parsing
//!
//! # Usage
//!
//! ```rust
//! use strata_core::{Error, LayerImage, Rect};
//!
//! let layer = LayerImage::new(4, 4);
//! let err = layer.check_region(Rect::new(2, 2, 4, 4)).unwrap_err();
//! assert!(matches!(err, Error::InvalidRegion { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling layer buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Region of interest extends beyond image bounds or is empty.
    ///
    /// Returned when a [`crate::rect::Rect`] doesn't fit within the
    /// image dimensions.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid image dimensions or data length.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Text could not be parsed into a geometry value.
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRegion {
            rx: 100,
            ry: 50,
            rw: 10,
            rh: 10,
            width: 80,
            height: 60,
        };
        assert_eq!(
            err.to_string(),
            "region (100, 50, 10x10) exceeds image bounds 80x60"
        );
    }

    #[test]
    fn test_parse_error_from_rect() {
        let err = "1,2".parse::<crate::Rect>().unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
