//! Layer image buffer.
//!
//! A [`LayerImage`] is one rasterized cross-section of a resin print: a
//! single-channel, 8-bit buffer stored row-major, top-to-bottom.
//!
//! ```text
//! Memory: [p p p p p ...]  ← Row 0
//!         [p p p p p ...]  ← Row 1
//!         ...
//! ```
//!
//! # Sharing
//!
//! Pixel data lives behind an [`Arc`], so cloning a layer is cheap and the
//! clone can be handed to many threads as a read-only snapshot. The first
//! mutation through [`LayerImage::data_mut`] detaches the buffer
//! (copy-on-write), leaving every other holder untouched.
//!
//! ```rust
//! use strata_core::LayerImage;
//!
//! let a = LayerImage::filled(4, 4, 255);
//! let mut b = a.clone();
//! assert!(a.shares_buffer(&b));
//!
//! b.data_mut()[0] = 0;
//! assert!(!a.shares_buffer(&b));
//! assert_eq!(a.pixel(0, 0), 255);
//! ```

use crate::{Error, Rect, Result};
use std::sync::Arc;

/// Owned 8-bit single-channel layer buffer with copy-on-write sharing.
#[derive(Clone, PartialEq, Eq)]
pub struct LayerImage {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<u8>>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

impl LayerImage {
    /// Creates a new black (all zero) layer.
    ///
    /// ```rust
    /// use strata_core::LayerImage;
    ///
    /// let img = LayerImage::new(1920, 1080);
    /// assert_eq!(img.dimensions(), (1920, 1080));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Creates a layer with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: Arc::new(vec![value; width as usize * height as usize]),
            width,
            height,
        }
    }

    /// Creates a layer from existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidDimensions {
                width,
                height,
                reason: format!("expected {} pixels, got {}", expected, data.len()),
            });
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Creates a layer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> u8,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Returns the layer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the layer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns a rectangle covering the entire layer.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the pixel data.
    ///
    /// If the data is shared (Arc refcount > 1), this clones the data
    /// to ensure exclusive access (copy-on-write).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Returns `true` if both layers point at the same pixel buffer.
    #[inline]
    pub fn shares_buffer(&self, other: &LayerImage) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Returns a row of pixels.
    ///
    /// # Panics
    ///
    /// Panics if y >= height.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.offset(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Checks that `region` is non-empty and lies inside this layer.
    pub fn check_region(&self, region: Rect) -> Result<()> {
        if region.is_empty() || !self.bounds().contains_rect(&region) {
            return Err(Error::InvalidRegion {
                rx: region.x,
                ry: region.y,
                rw: region.width,
                rh: region.height,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for LayerImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("shared", &(Arc::strong_count(&self.data) > 1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let img = LayerImage::new(8, 4);
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.data().len(), 32);
        assert!(img.data().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_from_data_length() {
        assert!(LayerImage::from_data(2, 2, vec![0; 4]).is_ok());
        let err = LayerImage::from_data(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_copy_on_write() {
        let a = LayerImage::filled(4, 4, 10);
        let mut b = a.clone();
        assert!(a.shares_buffer(&b));

        b.data_mut()[0] = 99;
        assert!(!a.shares_buffer(&b));
        assert_eq!(a.pixel(0, 0), 10);
        assert_eq!(b.pixel(0, 0), 99);
    }

    #[test]
    fn test_rows() {
        let img = LayerImage::from_fn(3, 2, |x, y| (y * 3 + x) as u8);
        assert_eq!(img.row(0), &[0, 1, 2]);
        assert_eq!(img.row(1), &[3, 4, 5]);
    }

    #[test]
    fn test_check_region() {
        let img = LayerImage::new(10, 10);
        assert!(img.check_region(Rect::new(0, 0, 10, 10)).is_ok());
        assert!(img.check_region(Rect::new(5, 5, 6, 1)).is_err());
        assert!(img.check_region(Rect::new(0, 0, 0, 5)).is_err());
        assert!(img.check_region(Rect::new(u32::MAX - 1, 0, 10, 10)).is_err());
    }
}
