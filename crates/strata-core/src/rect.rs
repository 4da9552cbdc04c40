//! Rectangle and Region of Interest (ROI) types for layer operations.
//!
//! An ROI limits where a layer operation reads and writes. When no ROI is
//! configured the operation covers the whole layer.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Layer   │
//!   │   │  Region  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use strata_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! let other = Rect::new(50, 40, 100, 50);
//! let overlap = rect.intersect(&other).unwrap();
//! assert_eq!(overlap, Rect::new(50, 40, 60, 30));
//! ```

use crate::Error;
use std::str::FromStr;

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is considered empty.
///
/// # Example
///
/// ```rust
/// use strata_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 110);
/// assert_eq!(rect.bottom(), 70);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from origin (0, 0) with given dimensions.
    ///
    /// ```rust
    /// use strata_core::Rect;
    ///
    /// let rect = Rect::from_size(1920, 1080);
    /// assert_eq!((rect.x, rect.y), (0, 0));
    /// ```
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns the X coordinate of the right edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Returns the Y coordinate of the bottom edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the `(width, height)` pair.
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns `true` if this rectangle fully contains another.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles don't overlap.
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Clamps this rectangle to fit within `max_width` x `max_height`.
    ///
    /// Returns `None` if there's no overlap.
    ///
    /// ```rust
    /// use strata_core::Rect;
    ///
    /// let clamped = Rect::new(900, 500, 200, 200).clamp_to(1000, 600).unwrap();
    /// assert_eq!(clamped, Rect::new(900, 500, 100, 100));
    /// ```
    #[inline]
    pub fn clamp_to(&self, max_width: u32, max_height: u32) -> Option<Rect> {
        self.intersect(&Rect::from_size(max_width, max_height))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Parses `x,y,width,height`.
///
/// ```rust
/// use strata_core::Rect;
///
/// let rect: Rect = "10, 20, 30, 40".parse().unwrap();
/// assert_eq!(rect, Rect::new(10, 20, 30, 40));
/// ```
impl FromStr for Rect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::Parse(format!("rect '{}': {}", s, e)))?;

        match parts.as_slice() {
            [x, y, w, h] => Ok(Rect::new(*x, *y, *w, *h)),
            _ => Err(Error::Parse(format!(
                "rect '{}': expected x,y,width,height",
                s
            ))),
        }
    }
}

/// Region of Interest - optionally unbounded rectangle.
///
/// `Roi::Full` means "the entire layer" without knowing the layer size.
///
/// ```rust
/// use strata_core::{Rect, Roi};
///
/// assert_eq!(Roi::Full.resolve(1920, 1080), Rect::from_size(1920, 1080));
///
/// let roi = Roi::from(Some(Rect::new(100, 100, 500, 500)));
/// assert_eq!(roi.resolve(1920, 1080), Rect::new(100, 100, 500, 500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Roi {
    /// The entire layer (unbounded)
    #[default]
    Full,
    /// A specific rectangular region
    Region(Rect),
}

impl Roi {
    /// Resolves this ROI to an actual [`Rect`] given layer dimensions.
    ///
    /// A region is clamped to the layer bounds; a region with no overlap
    /// resolves to an empty rectangle.
    #[inline]
    pub fn resolve(&self, width: u32, height: u32) -> Rect {
        match self {
            Self::Full => Rect::from_size(width, height),
            Self::Region(r) => r.clamp_to(width, height).unwrap_or_default(),
        }
    }
}

impl From<Option<Rect>> for Roi {
    fn from(rect: Option<Rect>) -> Self {
        rect.map_or(Roi::Full, Roi::Region)
    }
}
