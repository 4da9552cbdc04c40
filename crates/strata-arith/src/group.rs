//! Operation groups: the compiled form of one `targets = expression` statement.
//!
//! ```text
//! "10,11,12=11+12-10*5"
//!
//! targets    = {10, 11, 12}
//! operations = [(11, +), (12, -), (10, *), (5, none)]
//! ```
//!
//! The operator of each [`Operation`] combines the running result with the
//! *next* operand. Evaluation is strictly left to right, with no precedence.

use crate::ArithmeticOperator;
use std::collections::BTreeSet;
use std::fmt;

/// One operand of an expression and the operator that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation {
    /// Source layer index
    pub layer: u32,
    /// Operator combining the result so far with the next operand
    pub operator: ArithmeticOperator,
}

impl Operation {
    /// Creates an operation.
    pub const fn new(layer: u32, operator: ArithmeticOperator) -> Self {
        Self { layer, operator }
    }

    /// Creates a terminal operation.
    pub const fn terminal(layer: u32) -> Self {
        Self::new(layer, ArithmeticOperator::None)
    }
}

/// Target layers plus the ordered operations whose result is written to them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationGroup {
    targets: BTreeSet<u32>,
    operations: Vec<Operation>,
}

impl OperationGroup {
    /// Creates a group; duplicate targets collapse.
    pub fn new(targets: impl IntoIterator<Item = u32>, operations: Vec<Operation>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            operations,
        }
    }

    /// Target layers, ascending.
    pub fn targets(&self) -> &BTreeSet<u32> {
        &self.targets
    }

    /// Operations, in evaluation order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Layer whose image seeds the fold.
    pub fn seed_layer(&self) -> Option<u32> {
        self.operations.first().map(|op| op.layer)
    }

    /// Returns `true` if executing this group can change anything.
    ///
    /// A group needs targets and operations, and must not be a single
    /// operand copied onto itself (`5=5`).
    ///
    /// ```rust
    /// use strata_arith::{Operation, OperationGroup};
    ///
    /// assert!(!OperationGroup::new([5], vec![Operation::terminal(5)]).is_valid());
    /// assert!(OperationGroup::new([6], vec![Operation::terminal(5)]).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        if self.targets.is_empty() || self.operations.is_empty() {
            return false;
        }
        !(self.targets.len() == 1
            && self.operations.len() == 1
            && self.targets.contains(&self.operations[0].layer))
    }

    /// Returns `true` if there is nothing to fold after the seed.
    pub fn is_copy(&self) -> bool {
        self.operations.len() == 1
    }
}

/// Renders the canonical sentence, e.g. `10,11,12=11+12-10*5`.
impl fmt::Display for OperationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, target) in self.targets.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", target)?;
        }
        f.write_str("=")?;
        for op in &self.operations {
            write!(f, "{}{}", op.layer, op.operator)?;
        }
        Ok(())
    }
}
