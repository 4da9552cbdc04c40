//! CLI command implementations

pub mod apply;
pub mod parse;

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use strata_core::LayerImage;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Reads an 8-bit PNG as a layer.
///
/// Palette and 16-bit images are expanded to 8 bits; colour images keep
/// only their first channel.
pub fn read_layer(path: &Path) -> Result<LayerImage> {
    trace!(path = %path.display(), "read_layer");

    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .with_context(|| format!("Cannot size output buffer: {}", path.display()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    buf.truncate(info.buffer_size());

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => bail!("Unsupported PNG colour type {:?}: {}", other, path.display()),
    };
    if info.bit_depth != png::BitDepth::Eight {
        bail!("Unsupported PNG bit depth {:?}: {}", info.bit_depth, path.display());
    }

    let data = if channels == 1 {
        buf
    } else {
        buf.chunks_exact(channels).map(|px| px[0]).collect()
    };

    LayerImage::from_data(info.width, info.height, data)
        .with_context(|| format!("Bad layer image: {}", path.display()))
}

/// Writes a layer as an 8-bit grayscale PNG.
pub fn write_layer(path: &Path, image: &LayerImage) -> Result<()> {
    trace!(path = %path.display(), width = image.width(), height = image.height(), "write_layer");

    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .write_image_data(image.data())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    Ok(())
}

/// Lists `*.png` files of `dir` in name order; position is the layer index.
pub fn layer_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect();
    files.sort();
    debug!(dir = %dir.display(), layers = files.len(), "found layer files");
    Ok(files)
}

/// Loads every layer file of `dir`.
pub fn load_layers(dir: &Path) -> Result<(Vec<PathBuf>, Vec<LayerImage>)> {
    let files = layer_files(dir)?;
    if files.is_empty() {
        bail!("No PNG layers in {}", dir.display());
    }
    let layers = files
        .iter()
        .map(|path| read_layer(path))
        .collect::<Result<Vec<_>>>()?;
    Ok((files, layers))
}
