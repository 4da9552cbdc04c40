//! Region extraction and masked copy.
//!
//! Layer operations that honour a region of interest read a cropped copy
//! of each layer, work on it, and then write the result back into the
//! same region with [`copy_masked`].
//!
//! ```rust
//! use strata_core::{LayerImage, Rect};
//! use strata_ops::copy::{copy_masked, crop};
//!
//! let layer = LayerImage::from_fn(8, 8, |x, y| (x + y) as u8);
//! let region = Rect::new(2, 2, 4, 4);
//!
//! let mut patch = crop(&layer, region).unwrap();
//! patch.data_mut().fill(0);
//!
//! let mut target = layer.clone();
//! copy_masked(&patch, &mut target, region, None).unwrap();
//! assert_eq!(target.pixel(3, 3), 0);
//! assert_eq!(target.pixel(0, 0), 0);
//! assert_eq!(target.pixel(7, 7), 14);
//! ```

use crate::rows::for_each_row;
use crate::{ensure_same_size, OpsError, OpsResult};
use strata_core::{LayerImage, Rect};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Returns a copy of `region` from `src`.
///
/// # Errors
///
/// Fails if `region` is empty or not fully inside `src`.
pub fn crop(src: &LayerImage, region: Rect) -> OpsResult<LayerImage> {
    if region == src.bounds() {
        return Ok(src.clone());
    }
    src.check_region(region)?;

    let x0 = region.x as usize;
    let w = region.width as usize;

    let mut data = Vec::with_capacity(w * region.height as usize);
    for y in region.y..region.bottom() {
        data.extend_from_slice(&src.row(y)[x0..x0 + w]);
    }

    Ok(LayerImage::from_data(region.width, region.height, data)?)
}

/// Copies `src` into `region` of `dst`, restricted to non-zero `mask` pixels.
///
/// `src` and `mask` are region-sized. Pixels of `dst` outside `region`, and
/// inside it where the mask is zero, keep their original values.
///
/// # Errors
///
/// Fails if `region` is not inside `dst`, or if `src`/`mask` are not
/// `region.width x region.height`.
pub fn copy_masked(
    src: &LayerImage,
    dst: &mut LayerImage,
    region: Rect,
    mask: Option<&LayerImage>,
) -> OpsResult<()> {
    trace!(region = %region, masked = mask.is_some(), "copy::copy_masked");

    dst.check_region(region)?;
    if src.dimensions() != region.size() {
        return Err(OpsError::SizeMismatch(format!(
            "copy source {}x{} does not fit region {}",
            src.width(),
            src.height(),
            region
        )));
    }
    if let Some(mask) = mask {
        ensure_same_size("copy mask", src, mask)?;
    }

    // Whole-layer unmasked copy: share the source buffer.
    if mask.is_none() && region == dst.bounds() {
        *dst = src.clone();
        return Ok(());
    }

    let dst_w = dst.width() as usize;
    let (x0, y0) = (region.x as usize, region.y as usize);
    let (w, h) = (region.width as usize, region.height as usize);
    let src_data = src.data();
    let mask_data = mask.map(|m| m.data());

    for_each_row(dst.data_mut(), dst_w, |y, row| {
        if y < y0 || y >= y0 + h {
            return;
        }
        let sy = y - y0;
        let src_row = &src_data[sy * w..(sy + 1) * w];
        let dst_row = &mut row[x0..x0 + w];
        match mask_data {
            None => dst_row.copy_from_slice(src_row),
            Some(mask_data) => {
                let mask_row = &mask_data[sy * w..(sy + 1) * w];
                for ((d, &s), &m) in dst_row.iter_mut().zip(src_row).zip(mask_row) {
                    if m != 0 {
                        *d = s;
                    }
                }
            }
        }
    });

    Ok(())
}
