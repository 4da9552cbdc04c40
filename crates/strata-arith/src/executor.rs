//! Evaluates operation groups against a layer store.
//!
//! # Per group
//!
//! ```text
//! seed     result = crop(layer[ops[0]], region)
//! fold     result = result <ops[i-1].operator> crop(layer[ops[i]], region)   (sequential)
//! broadcast
//!          for target in targets (parallel):
//!              layer[target] = copy result into region of layer[target]
//! ```
//!
//! Groups run one after the other in declaration order: a group may read
//! layers an earlier group wrote. Within a group the fold is sequential,
//! while the broadcast writes distinct targets on a rayon pool and only
//! reads the finished result.
//!
//! # Region and mask
//!
//! With no ROI the region is the whole layer. A mask must have the
//! region's size; its non-zero pixels select what is written. Add,
//! subtract and the bitwise operators also honour it while folding;
//! multiply, divide and absolute difference fold over the whole region.
//!
//! # Cancellation
//!
//! Every fold step and every target write first passes
//! [`Progress::checkpoint`]. Writes already committed when cancellation is
//! observed stay in the store.

use crate::{ArithError, ArithResult, LayerStore, OperationGroup, Progress};
use rayon::prelude::*;
use strata_core::{LayerImage, Rect, Roi};
use strata_ops::copy::{copy_masked, crop};
#[allow(unused_imports)]
use tracing::{debug, info, trace, warn};

/// Executor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutorConfig {
    /// Worker count for target writes (None = rayon global pool, sized to the machine).
    pub max_threads: Option<usize>,
}

/// How an execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Every valid group wrote every target.
    Completed,
    /// Cancellation was observed; earlier writes were kept.
    Cancelled,
}

impl ExecutionStatus {
    /// Returns `true` for [`ExecutionStatus::Completed`].
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Runs operation groups on a [`LayerStore`].
#[derive(Debug)]
pub struct Executor {
    config: ExecutorConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// Creates an executor on the rayon global pool.
    pub fn new() -> Self {
        Self {
            config: ExecutorConfig::default(),
            pool: None,
        }
    }

    /// Creates an executor; `max_threads` builds a dedicated pool.
    ///
    /// # Errors
    ///
    /// [`ArithError::ThreadPool`] if the pool cannot be built.
    pub fn with_config(config: ExecutorConfig) -> ArithResult<Self> {
        let pool = match config.max_threads {
            Some(n) if n > 0 => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("strata-arith-{}", i))
                    .build()
                    .map_err(|e| ArithError::ThreadPool(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(Self { config, pool })
    }

    /// Current configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Number of workers used for target writes.
    pub fn worker_count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Evaluates `groups` in order.
    ///
    /// Groups failing [`OperationGroup::is_valid`] are skipped.
    ///
    /// # Errors
    ///
    /// - [`ArithError::NoEffect`] if no group is valid (nothing is written)
    /// - [`ArithError::MaskMismatch`] if the mask does not match the region
    ///   of any valid group (nothing is written)
    /// - an invalid region error if the ROI misses any valid group's seed
    ///   layer (nothing is written)
    /// - store and pixel errors raised while running
    pub fn execute<S>(
        &self,
        groups: &[OperationGroup],
        store: &S,
        roi: Option<Rect>,
        mask: Option<&LayerImage>,
        progress: &Progress,
    ) -> ArithResult<ExecutionStatus>
    where
        S: LayerStore + ?Sized,
    {
        trace!(groups = groups.len(), roi = ?roi, masked = mask.is_some(), "executor::execute");

        let valid: Vec<&OperationGroup> = groups
            .iter()
            .filter(|group| {
                let ok = group.is_valid();
                if !ok {
                    warn!(group = %group, "group has no effect, skipping");
                }
                ok
            })
            .collect();

        if valid.is_empty() {
            return Err(ArithError::NoEffect);
        }

        // Fail on a bad region or mask before any layer is written.
        for group in &valid {
            if let Some(seed) = group.seed_layer() {
                let (w, h) = store.get_image(seed)?.dimensions();
                resolve_region(w, h, roi, mask)?;
            }
        }

        progress.reset(valid.iter().map(|g| g.targets().len()).sum());
        info!(
            groups = valid.len(),
            targets = progress.total(),
            workers = self.worker_count(),
            "running layer arithmetic"
        );

        for (index, group) in valid.iter().enumerate() {
            let status = self.run_group(group, store, roi, mask, progress)?;
            if status == ExecutionStatus::Cancelled {
                info!(group = index, processed = progress.processed(), "layer arithmetic cancelled");
                return Ok(status);
            }
        }

        debug!(processed = progress.processed(), "layer arithmetic completed");
        Ok(ExecutionStatus::Completed)
    }

    fn run_group<S>(
        &self,
        group: &OperationGroup,
        store: &S,
        roi: Option<Rect>,
        mask: Option<&LayerImage>,
        progress: &Progress,
    ) -> ArithResult<ExecutionStatus>
    where
        S: LayerStore + ?Sized,
    {
        let operations = group.operations();
        debug!(group = %group, "evaluating group");

        if !progress.checkpoint() {
            return Ok(ExecutionStatus::Cancelled);
        }

        let seed = store.get_image(operations[0].layer)?;
        let region = resolve_region(seed.width(), seed.height(), roi, mask)?;
        let mut result = crop(&seed, region)?;
        drop(seed);

        for pair in operations.windows(2) {
            let operator = pair[0].operator;
            if operator.is_none() {
                break;
            }
            if !progress.checkpoint() {
                return Ok(ExecutionStatus::Cancelled);
            }
            let operand = crop(&store.get_image(pair[1].layer)?, region)?;
            operator.apply(&mut result, &operand, mask)?;
            trace!(operator = %operator, operand = pair[1].layer, "fold step");
        }

        // Frozen from here on: the broadcast only borrows it.
        let result = result;
        let restricted = group.is_copy() || roi.is_some() || mask.is_some();

        let write = |target: u32| -> ArithResult<bool> {
            if !progress.checkpoint() {
                return Ok(false);
            }
            let image = if restricted {
                let mut image = store.get_image(target)?;
                copy_masked(&result, &mut image, region, mask)?;
                image
            } else {
                result.clone()
            };
            store.set_image(target, image)?;
            progress.increment();
            Ok(true)
        };

        let targets: Vec<u32> = group.targets().iter().copied().collect();
        let written: Vec<bool> = self.install(|| {
            targets
                .par_iter()
                .map(|&target| write(target))
                .collect::<ArithResult<Vec<bool>>>()
        })?;

        if written.iter().all(|&w| w) {
            Ok(ExecutionStatus::Completed)
        } else {
            Ok(ExecutionStatus::Cancelled)
        }
    }

    fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

/// Resolves the working region for a `width` x `height` layer and checks the mask.
fn resolve_region(
    width: u32,
    height: u32,
    roi: Option<Rect>,
    mask: Option<&LayerImage>,
) -> ArithResult<Rect> {
    let region = Roi::from(roi).resolve(width, height);
    if region.is_empty() {
        let requested = roi.unwrap_or_default();
        return Err(strata_core::Error::InvalidRegion {
            rx: requested.x,
            ry: requested.y,
            rw: requested.width,
            rh: requested.height,
            width,
            height,
        }
        .into());
    }
    if let Some(mask) = mask {
        if mask.dimensions() != region.size() {
            return Err(ArithError::MaskMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                region_width: region.width,
                region_height: region.height,
            });
        }
    }
    Ok(region)
}
