//! Pixel-wise binary operations between two layers.
//!
//! All operations accumulate into the first operand: `dst = dst <op> src`.
//! When a mask is given, only pixels whose mask value is non-zero are
//! written; every other pixel of `dst` keeps its value.
//!
//! # Saturation
//!
//! | Op | Result |
//! |---|---|
//! | [`BinaryOp::Add`] | `min(a + b, 255)` |
//! | [`BinaryOp::Subtract`] | `max(a - b, 0)` |
//! | [`BinaryOp::Multiply`] | `min(a * b, 255)` |
//! | [`BinaryOp::Divide`] | `round(a / b)`, `0` when `b == 0` |
//! | [`BinaryOp::And`], [`BinaryOp::Or`], [`BinaryOp::Xor`] | bitwise |
//! | [`BinaryOp::AbsDiff`] | `abs(a - b)` |
//!
//! # Example
//!
//! ```rust
//! use strata_core::LayerImage;
//! use strata_ops::binary::{apply, BinaryOp};
//!
//! let mut a = LayerImage::filled(2, 2, 10);
//! let b = LayerImage::filled(2, 2, 30);
//! apply(BinaryOp::AbsDiff, &mut a, &b, None).unwrap();
//! assert_eq!(a.pixel(1, 1), 20);
//! ```

use crate::rows::for_each_row;
use crate::{ensure_same_size, OpsResult};
use strata_core::LayerImage;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Pixel-wise operation combining two 8-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Saturating addition.
    Add,
    /// Saturating subtraction.
    Subtract,
    /// Saturating multiplication.
    Multiply,
    /// Rounded division; division by zero yields zero.
    Divide,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Absolute difference.
    AbsDiff,
}

impl BinaryOp {
    /// Combines one pixel pair.
    #[inline]
    pub const fn apply_pixel(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Add => a.saturating_add(b),
            Self::Subtract => a.saturating_sub(b),
            Self::Multiply => {
                let p = a as u16 * b as u16;
                if p > 255 { 255 } else { p as u8 }
            }
            Self::Divide => {
                if b == 0 {
                    0
                } else {
                    // round half up: (2a + b) / 2b
                    let q = (2 * a as u16 + b as u16) / (2 * b as u16);
                    if q > 255 { 255 } else { q as u8 }
                }
            }
            Self::And => a & b,
            Self::Or => a | b,
            Self::Xor => a ^ b,
            Self::AbsDiff => a.abs_diff(b),
        }
    }

    /// Short lowercase name, used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::AbsDiff => "absdiff",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies `dst = dst <op> src`, restricted to non-zero `mask` pixels.
///
/// # Errors
///
/// Returns [`crate::OpsError::SizeMismatch`] if `src` or `mask` differ in
/// size from `dst`.
pub fn apply(
    op: BinaryOp,
    dst: &mut LayerImage,
    src: &LayerImage,
    mask: Option<&LayerImage>,
) -> OpsResult<()> {
    trace!(op = %op, w = dst.width(), h = dst.height(), masked = mask.is_some(), "binary::apply");

    ensure_same_size(op.name(), dst, src)?;
    if let Some(mask) = mask {
        ensure_same_size("mask", dst, mask)?;
    }

    let width = dst.width() as usize;
    let src_data = src.data();

    match mask {
        None => for_each_row(dst.data_mut(), width, |y, row| {
            let src_row = &src_data[y * width..(y + 1) * width];
            for (d, &s) in row.iter_mut().zip(src_row) {
                *d = op.apply_pixel(*d, s);
            }
        }),
        Some(mask) => {
            let mask_data = mask.data();
            for_each_row(dst.data_mut(), width, |y, row| {
                let src_row = &src_data[y * width..(y + 1) * width];
                let mask_row = &mask_data[y * width..(y + 1) * width];
                for ((d, &s), &m) in row.iter_mut().zip(src_row).zip(mask_row) {
                    if m != 0 {
                        *d = op.apply_pixel(*d, s);
                    }
                }
            })
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;

    #[test]
    fn test_pixel_saturation() {
        assert_eq!(BinaryOp::Add.apply_pixel(200, 100), 255);
        assert_eq!(BinaryOp::Subtract.apply_pixel(10, 20), 0);
        assert_eq!(BinaryOp::Multiply.apply_pixel(16, 16), 255);
        assert_eq!(BinaryOp::Multiply.apply_pixel(3, 5), 15);
        assert_eq!(BinaryOp::AbsDiff.apply_pixel(10, 250), 240);
    }

    #[test]
    fn test_divide_rounding_and_zero() {
        assert_eq!(BinaryOp::Divide.apply_pixel(255, 0), 0);
        assert_eq!(BinaryOp::Divide.apply_pixel(10, 4), 3); // 2.5 rounds up
        assert_eq!(BinaryOp::Divide.apply_pixel(10, 3), 3);
        assert_eq!(BinaryOp::Divide.apply_pixel(255, 1), 255);
        assert_eq!(BinaryOp::Divide.apply_pixel(0, 7), 0);
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(BinaryOp::And.apply_pixel(0b1100, 0b1010), 0b1000);
        assert_eq!(BinaryOp::Or.apply_pixel(0b1100, 0b1010), 0b1110);
        assert_eq!(BinaryOp::Xor.apply_pixel(0b1100, 0b1010), 0b0110);
    }

    #[test]
    fn test_apply_unmasked() {
        let mut dst = LayerImage::from_fn(4, 3, |x, _| x as u8 * 10);
        let src = LayerImage::filled(4, 3, 5);
        apply(BinaryOp::Subtract, &mut dst, &src, None).unwrap();
        assert_eq!(dst.row(2), &[0, 5, 15, 25]);
    }

    #[test]
    fn test_apply_masked_leaves_outside_untouched() {
        let mut dst = LayerImage::filled(4, 4, 100);
        let src = LayerImage::filled(4, 4, 50);
        let mask = LayerImage::from_fn(4, 4, |x, _| if x < 2 { 255 } else { 0 });

        apply(BinaryOp::Add, &mut dst, &src, Some(&mask)).unwrap();

        for y in 0..4 {
            assert_eq!(dst.row(y), &[150, 150, 100, 100]);
        }
    }

    #[test]
    fn test_apply_size_mismatch() {
        let mut dst = LayerImage::new(4, 4);
        let src = LayerImage::new(4, 5);
        let err = apply(BinaryOp::Multiply, &mut dst, &src, None).unwrap_err();
        assert!(matches!(err, OpsError::SizeMismatch(_)));

        let src = LayerImage::new(4, 4);
        let mask = LayerImage::new(2, 2);
        assert!(apply(BinaryOp::Or, &mut dst, &src, Some(&mask)).is_err());
    }

    #[test]
    fn test_apply_does_not_touch_shared_snapshot() {
        let original = LayerImage::filled(2, 2, 1);
        let mut dst = original.clone();
        apply(BinaryOp::Xor, &mut dst, &LayerImage::filled(2, 2, 1), None).unwrap();
        assert_eq!(dst.data(), &[0, 0, 0, 0]);
        assert_eq!(original.data(), &[1, 1, 1, 1]);
    }
}
