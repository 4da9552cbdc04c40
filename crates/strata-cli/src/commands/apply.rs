//! Apply command
//!
//! Runs a sentence against a directory of layer PNGs and writes back the
//! layers that changed.

use crate::ApplyArgs;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use strata_arith::{LayerArithmetic, LayerStore, MemoryLayerStore, Progress};
#[allow(unused_imports)]
use tracing::{debug, info, trace, warn};

pub fn run(args: ApplyArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), sentence = %args.sentence, "apply::run");

    let (files, layers) = super::load_layers(&args.input)?;
    let before = layers.clone();
    let store = MemoryLayerStore::new(layers);
    info!(layers = store.len(), dir = %args.input.display(), "loaded layers");

    let mut op = LayerArithmetic::new(args.sentence.as_str());
    op.set_roi(args.roi);
    if let Some(path) = &args.mask {
        op.set_mask(Some(super::read_layer(path)?));
    }

    op.try_parse(store.last_layer_index())
        .with_context(|| format!("Failed to parse: {:?}", args.sentence))?;
    let diagnostics = op.diagnostics();
    if !diagnostics.is_clean() {
        warn!(
            dropped_operands = diagnostics.dropped_operands,
            dropped_targets = diagnostics.dropped_targets,
            skipped_symbols = diagnostics.skipped_symbols,
            "parts of the sentence were ignored"
        );
    }
    op.validate().context("Nothing to do")?;

    if verbose || args.dry_run {
        for group in op.groups() {
            println!("{}{}", group, if group.is_valid() { "" } else { "  (no effect)" });
        }
    }
    if args.dry_run {
        println!("Dry run, nothing written.");
        return Ok(());
    }

    let progress = Progress::new();
    let completed = op.execute(&store, &progress)?;
    if !completed {
        bail!("Cancelled after {} of {} layer writes", progress.processed(), progress.total());
    }

    let written = write_changed(&args, &files, &before, &store.into_layers())?;
    println!("{} layer(s) written.", written);
    Ok(())
}

/// Writes every layer that differs from its loaded state; returns the count.
fn write_changed(
    args: &ApplyArgs,
    files: &[PathBuf],
    before: &[strata_core::LayerImage],
    after: &[strata_core::LayerImage],
) -> Result<usize> {
    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create: {}", dir.display()))?;
    }

    let mut written = 0;
    for ((path, old), new) in files.iter().zip(before).zip(after) {
        if new.shares_buffer(old) || old == new {
            continue;
        }
        let dest = match (&args.output, path.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => path.clone(),
        };
        debug!(path = %dest.display(), "writing layer");
        super::write_layer(&dest, new)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{read_layer, write_layer};
    use strata_core::{LayerImage, Rect};

    fn make_stack(values: &[u8]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (i, &v) in values.iter().enumerate() {
            let path = dir.path().join(format!("{:05}.png", i));
            write_layer(&path, &LayerImage::filled(6, 4, v)).unwrap();
        }
        dir
    }

    fn args(input: PathBuf, sentence: &str) -> ApplyArgs {
        ApplyArgs {
            input,
            sentence: sentence.to_string(),
            output: None,
            roi: None,
            mask: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_apply_in_place() {
        let dir = make_stack(&[10, 20, 0]);
        run(args(dir.path().to_path_buf(), "2 = 0 + 1"), false).unwrap();

        let out = read_layer(&dir.path().join("00002.png")).unwrap();
        assert_eq!(out, LayerImage::filled(6, 4, 30));
        let untouched = read_layer(&dir.path().join("00000.png")).unwrap();
        assert_eq!(untouched, LayerImage::filled(6, 4, 10));
    }

    #[test]
    fn test_apply_to_output_dir_with_roi() {
        let dir = make_stack(&[10, 20, 0]);
        let out_dir = tempfile::tempdir().unwrap();

        let mut a = args(dir.path().to_path_buf(), "2 = 0 + 1");
        a.output = Some(out_dir.path().to_path_buf());
        a.roi = Some(Rect::new(1, 1, 2, 2));
        run(a, false).unwrap();

        // only the changed layer lands in the output directory
        assert!(!out_dir.path().join("00000.png").exists());
        let out = read_layer(&out_dir.path().join("00002.png")).unwrap();
        assert_eq!(out.pixel(1, 1), 30);
        assert_eq!(out.pixel(0, 0), 0);

        let original = read_layer(&dir.path().join("00002.png")).unwrap();
        assert_eq!(original, LayerImage::filled(6, 4, 0));
    }

    #[test]
    fn test_apply_with_mask() {
        let dir = make_stack(&[10, 20, 5]);
        let mask_dir = tempfile::tempdir().unwrap();
        let mask_path = mask_dir.path().join("mask.png");
        write_layer(&mask_path, &LayerImage::from_fn(6, 4, |x, _| if x < 3 { 255 } else { 0 })).unwrap();

        let mut a = args(dir.path().to_path_buf(), "2 = 0 + 1");
        a.mask = Some(mask_path);
        run(a, false).unwrap();

        let out = read_layer(&dir.path().join("00002.png")).unwrap();
        assert_eq!(out.pixel(0, 0), 30);
        assert_eq!(out.pixel(5, 0), 5);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = make_stack(&[10, 20, 0]);
        let mut a = args(dir.path().to_path_buf(), "2 = 0 + 1");
        a.dry_run = true;
        run(a, false).unwrap();

        let out = read_layer(&dir.path().join("00002.png")).unwrap();
        assert_eq!(out, LayerImage::filled(6, 4, 0));
    }

    #[test]
    fn test_no_effect_is_error() {
        let dir = make_stack(&[10, 20]);
        assert!(run(args(dir.path().to_path_buf(), "1 = 1"), false).is_err());
        assert!(run(args(dir.path().to_path_buf(), "  "), false).is_err());
    }
}
