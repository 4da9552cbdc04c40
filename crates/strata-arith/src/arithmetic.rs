//! The layer arithmetic operation as a host application drives it.
//!
//! ```rust
//! use strata_arith::{LayerArithmetic, LayerStore, MemoryLayerStore, Progress};
//! use strata_core::LayerImage;
//!
//! let store = MemoryLayerStore::new(vec![
//!     LayerImage::filled(8, 8, 40),
//!     LayerImage::filled(8, 8, 2),
//!     LayerImage::new(8, 8),
//! ]);
//!
//! let mut op = LayerArithmetic::new("2 = 0 * 1");
//! assert!(op.parse(store.last_layer_index()));
//! assert!(op.is_valid());
//! assert!(op.execute(&store, &Progress::new()).unwrap());
//! assert_eq!(store.get_image(2).unwrap().pixel(0, 0), 80);
//! ```

use crate::{
    parse_sentence, ArithError, ArithResult, ExecutionStatus, Executor, ExecutorConfig,
    LayerStore, OperationGroup, ParseDiagnostics, Progress,
};
use std::fmt;
use strata_core::{LayerImage, Rect};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Sentence, parsed groups and execution settings of one arithmetic operation.
#[derive(Debug, Clone, Default)]
pub struct LayerArithmetic {
    sentence: String,
    groups: Vec<OperationGroup>,
    diagnostics: ParseDiagnostics,
    roi: Option<Rect>,
    mask: Option<LayerImage>,
    config: ExecutorConfig,
}

impl LayerArithmetic {
    /// Creates an operation for `sentence`; call [`parse`](Self::parse) next.
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            ..Self::default()
        }
    }

    /// The raw sentence.
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    /// Replaces the sentence and forgets previously parsed groups.
    pub fn set_sentence(&mut self, text: impl Into<String>) {
        self.sentence = text.into();
        self.groups.clear();
        self.diagnostics = ParseDiagnostics::default();
    }

    /// Groups from the last successful parse.
    pub fn groups(&self) -> &[OperationGroup] {
        &self.groups
    }

    /// What the last parse dropped.
    pub fn diagnostics(&self) -> ParseDiagnostics {
        self.diagnostics
    }

    /// Region of interest; `None` means the whole layer.
    pub fn roi(&self) -> Option<Rect> {
        self.roi
    }

    /// Sets the region of interest.
    pub fn set_roi(&mut self, roi: Option<Rect>) {
        self.roi = roi;
    }

    /// Mask limiting which pixels are written.
    pub fn mask(&self) -> Option<&LayerImage> {
        self.mask.as_ref()
    }

    /// Sets the mask; it must have the size of the region of interest.
    pub fn set_mask(&mut self, mask: Option<LayerImage>) {
        self.mask = mask;
    }

    /// Executor settings.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Replaces the executor settings.
    pub fn set_config(&mut self, config: ExecutorConfig) {
        self.config = config;
    }

    /// Re-parses the sentence from scratch.
    ///
    /// # Errors
    ///
    /// Syntax errors from [`parse_sentence`]; the group list is left empty.
    pub fn try_parse(&mut self, last_layer_index: u32) -> ArithResult<&[OperationGroup]> {
        trace!(sentence = %self.sentence, last_layer_index, "LayerArithmetic::try_parse");
        self.groups.clear();
        self.diagnostics = ParseDiagnostics::default();

        let parsed = parse_sentence(&self.sentence, last_layer_index)?;
        self.groups = parsed.groups;
        self.diagnostics = parsed.diagnostics;
        Ok(&self.groups)
    }

    /// Re-parses the sentence; `true` if at least one group came out.
    pub fn parse(&mut self, last_layer_index: u32) -> bool {
        match self.try_parse(last_layer_index) {
            Ok(groups) => !groups.is_empty(),
            Err(e) => {
                debug!(error = %e, "sentence rejected");
                false
            }
        }
    }

    /// Returns `true` if at least one parsed group would change a layer.
    pub fn is_valid(&self) -> bool {
        self.groups.iter().any(OperationGroup::is_valid)
    }

    /// Like [`is_valid`](Self::is_valid), as an error for the caller to show.
    pub fn validate(&self) -> ArithResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ArithError::NoEffect)
        }
    }

    /// Runs the parsed groups with a fresh executor built from the config.
    ///
    /// Returns `Ok(true)` if everything was written, `Ok(false)` if
    /// cancelled part way.
    pub fn execute<S>(&self, store: &S, progress: &Progress) -> ArithResult<bool>
    where
        S: LayerStore + ?Sized,
    {
        let executor = Executor::with_config(self.config)?;
        self.execute_with(&executor, store, progress)
            .map(ExecutionStatus::is_completed)
    }

    /// Runs the parsed groups on `executor`.
    pub fn execute_with<S>(
        &self,
        executor: &Executor,
        store: &S,
        progress: &Progress,
    ) -> ArithResult<ExecutionStatus>
    where
        S: LayerStore + ?Sized,
    {
        self.validate()?;
        executor.execute(&self.groups, store, self.roi, self.mask.as_ref(), progress)
    }
}

/// Canonical sentence of the parsed groups, joined with `;`.
impl fmt::Display for LayerArithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryLayerStore;

    #[test]
    fn test_parse_is_idempotent() {
        let mut op = LayerArithmetic::new("1,2=3+4; 5$6");
        assert!(op.parse(10));
        let first = op.groups().to_vec();
        assert!(op.parse(10));
        assert_eq!(op.groups(), first.as_slice());
    }

    #[test]
    fn test_failed_parse_clears_groups() {
        let mut op = LayerArithmetic::new("1+2");
        assert!(op.parse(10));
        op.set_sentence("   ");
        assert!(!op.parse(10));
        assert!(op.groups().is_empty());
        assert!(!op.is_valid());
    }

    #[test]
    fn test_self_assignment_invalid() {
        let mut op = LayerArithmetic::new("5=5");
        assert!(op.parse(10));
        assert!(!op.is_valid());
        assert!(matches!(op.validate(), Err(ArithError::NoEffect)));
    }

    #[test]
    fn test_one_valid_group_is_enough() {
        let mut op = LayerArithmetic::new("5=5; 6=5");
        assert!(op.parse(10));
        assert!(op.is_valid());
    }

    #[test]
    fn test_display_joins_groups() {
        let mut op = LayerArithmetic::new(" 0:1 = 2 + 3 ; 4 ^ 5 ");
        op.parse(10);
        assert_eq!(op.to_string(), "0,1=2+3;4=4^5");
    }

    #[test]
    fn test_diagnostics_exposed() {
        let mut op = LayerArithmetic::new("1+20+2");
        assert!(op.parse(10));
        assert_eq!(op.diagnostics().dropped_operands, 1);
        op.set_sentence("1+2");
        assert!(op.diagnostics().is_clean());
    }

    #[test]
    fn test_execute_unparsed_is_no_effect() {
        let store = MemoryLayerStore::new(vec![LayerImage::new(2, 2); 2]);
        let op = LayerArithmetic::new("1=0");
        let err = op.execute(&store, &Progress::new()).unwrap_err();
        assert!(matches!(err, ArithError::NoEffect));
    }

    #[test]
    fn test_execute_with_mask_and_roi() {
        let store = MemoryLayerStore::new(vec![
            LayerImage::filled(4, 4, 10),
            LayerImage::filled(4, 4, 50),
        ]);
        let mut op = LayerArithmetic::new("1=0+0");
        op.set_roi(Some(Rect::new(0, 0, 2, 1)));
        op.set_mask(Some(LayerImage::from_data(2, 1, vec![255, 0]).unwrap()));
        assert!(op.parse(store.last_layer_index()));
        assert!(op.execute(&store, &Progress::new()).unwrap());

        let out = store.get_image(1).unwrap();
        assert_eq!(out.pixel(0, 0), 20); // 10 + 10 written through the mask
        assert_eq!(out.pixel(1, 0), 50); // masked out, original kept
        assert_eq!(out.pixel(0, 1), 50); // outside the region
    }
}
