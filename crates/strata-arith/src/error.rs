//! Error types for layer arithmetic.
//!
//! Syntax errors ([`ArithError::EmptySentence`], [`ArithError::EmptyExpression`])
//! and [`ArithError::NoEffect`] are raised before any layer is touched.
//! Cancellation is not an error: see [`crate::ExecutionStatus`].

use strata_ops::OpsError;
use thiserror::Error;

/// Error type for parsing and executing layer arithmetic.
#[derive(Error, Debug)]
pub enum ArithError {
    /// The sentence is empty or whitespace only.
    #[error("sentence is empty")]
    EmptySentence,

    /// A `;`-separated group has no operand left after tokenization.
    #[error("group {group} has no operands")]
    EmptyExpression {
        /// 0-based index of the group within the sentence
        group: usize,
    },

    /// Every group was dropped as a no-op.
    #[error("operation will have no effect")]
    NoEffect,

    /// Mask size differs from the resolved region of interest.
    #[error("mask is {mask_width}x{mask_height} but the region is {region_width}x{region_height}")]
    MaskMismatch {
        /// Mask width
        mask_width: u32,
        /// Mask height
        mask_height: u32,
        /// Region width
        region_width: u32,
        /// Region height
        region_height: u32,
    },

    /// A layer store was asked for an index it does not hold.
    #[error("layer {index} out of range (last layer is {last})")]
    LayerOutOfRange {
        /// Requested index
        index: u32,
        /// Last valid index
        last: u32,
    },

    /// Dedicated worker pool could not be built.
    #[error("thread pool: {0}")]
    ThreadPool(String),

    /// Buffer or region error.
    #[error(transparent)]
    Core(#[from] strata_core::Error),

    /// Pixel operation error.
    #[error(transparent)]
    Ops(#[from] OpsError),
}

impl ArithError {
    /// Returns `true` for errors caused by malformed sentence text.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::EmptySentence | Self::EmptyExpression { .. })
    }
}

/// Result type for layer arithmetic.
pub type ArithResult<T> = Result<T, ArithError>;
