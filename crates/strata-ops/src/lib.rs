//! # strata-ops
//!
//! Pixel-level primitives for resin slice layers.
//!
//! Every function here works on [`strata_core::LayerImage`] buffers of equal
//! size and follows 8-bit unsigned semantics: results saturate into
//! `[0, 255]` instead of wrapping or failing.
//!
//! # Modules
//!
//! - [`binary`] - Pixel-wise arithmetic and bitwise operations, optionally masked
//! - [`copy`] - Crop to a region and masked copy back into a layer
//!
//! # Example
//!
//! ```rust
//! use strata_core::LayerImage;
//! use strata_ops::{binary, BinaryOp};
//!
//! let mut acc = LayerImage::filled(4, 4, 200);
//! let other = LayerImage::filled(4, 4, 100);
//!
//! binary::apply(BinaryOp::Add, &mut acc, &other, None).unwrap();
//! assert_eq!(acc.pixel(0, 0), 255); // saturated
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod rows;
pub mod binary;
pub mod copy;

pub use binary::BinaryOp;
pub use error::{OpsError, OpsResult};

use strata_core::LayerImage;

/// Fails with [`OpsError::SizeMismatch`] unless both layers share dimensions.
pub(crate) fn ensure_same_size(what: &str, a: &LayerImage, b: &LayerImage) -> OpsResult<()> {
    if a.dimensions() != b.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "{}: {}x{} vs {}x{}",
            what,
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}
