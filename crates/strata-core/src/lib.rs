//! # strata-core
//!
//! Core types for resin slice layer editing.
//!
//! A resin print is a stack of rasterized cross-sections. Every crate in the
//! strata workspace works on those cross-sections through the types defined
//! here:
//!
//! - [`LayerImage`] - 8-bit single-channel layer buffer with copy-on-write sharing
//! - [`Rect`], [`Roi`] - Region of interest types
//! - [`Error`], [`Result`] - Buffer and geometry errors
//!
//! ## Crate Structure
//!
//! ```text
//! strata-core (this crate)
//!    ^
//!    |
//!    +-- strata-ops (pixel-wise primitives, masked copy)
//!    +-- strata-arith (layer arithmetic language + executor)
//!    +-- strata-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod rect;

pub use error::*;
pub use image::*;
pub use rect::*;
