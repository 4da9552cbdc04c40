//! Arithmetic operators of the layer language.
//!
//! | Symbol | Operator | Mask honoured |
//! |---|---|---|
//! | `+` | [`Add`](ArithmeticOperator::Add) | yes |
//! | `-` | [`Subtract`](ArithmeticOperator::Subtract) | yes |
//! | `*` | [`Multiply`](ArithmeticOperator::Multiply) | no |
//! | `/` | [`Divide`](ArithmeticOperator::Divide) | no |
//! | `&` | [`BitwiseAnd`](ArithmeticOperator::BitwiseAnd) | yes |
//! | `\|` | [`BitwiseOr`](ArithmeticOperator::BitwiseOr) | yes |
//! | `^` | [`BitwiseXor`](ArithmeticOperator::BitwiseXor) | yes |
//! | `$` | [`AbsDiff`](ArithmeticOperator::AbsDiff) | no |
//!
//! Multiply, divide and absolute difference ignore the mask and affect the
//! whole region. Existing sentences depend on that, so it stays.

use strata_core::LayerImage;
use strata_ops::{binary, BinaryOp, OpsResult};

/// Operator applied between an operand and the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithmeticOperator {
    /// Terminal operand, nothing follows.
    #[default]
    None,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `&`
    BitwiseAnd,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `$`
    AbsDiff,
}

impl ArithmeticOperator {
    /// Looks up the operator written as `c`.
    ///
    /// ```rust
    /// use strata_arith::ArithmeticOperator;
    ///
    /// assert_eq!(ArithmeticOperator::from_symbol('$'), Some(ArithmeticOperator::AbsDiff));
    /// assert_eq!(ArithmeticOperator::from_symbol('x'), None);
    /// ```
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '&' => Some(Self::BitwiseAnd),
            '|' => Some(Self::BitwiseOr),
            '^' => Some(Self::BitwiseXor),
            '$' => Some(Self::AbsDiff),
            _ => None,
        }
    }

    /// The symbol this operator is written with; `None` for the terminal marker.
    pub const fn symbol(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Add => Some('+'),
            Self::Subtract => Some('-'),
            Self::Multiply => Some('*'),
            Self::Divide => Some('/'),
            Self::BitwiseAnd => Some('&'),
            Self::BitwiseOr => Some('|'),
            Self::BitwiseXor => Some('^'),
            Self::AbsDiff => Some('$'),
        }
    }

    /// Returns `true` for the terminal marker.
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Pixel primitive backing this operator.
    pub const fn binary_op(self) -> Option<BinaryOp> {
        match self {
            Self::None => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Subtract => Some(BinaryOp::Subtract),
            Self::Multiply => Some(BinaryOp::Multiply),
            Self::Divide => Some(BinaryOp::Divide),
            Self::BitwiseAnd => Some(BinaryOp::And),
            Self::BitwiseOr => Some(BinaryOp::Or),
            Self::BitwiseXor => Some(BinaryOp::Xor),
            Self::AbsDiff => Some(BinaryOp::AbsDiff),
        }
    }

    /// Whether this operator restricts itself to the mask.
    pub const fn honours_mask(self) -> bool {
        !matches!(self, Self::Multiply | Self::Divide | Self::AbsDiff)
    }

    /// Folds `operand` into `acc`.
    ///
    /// `mask` is passed through only when [`honours_mask`](Self::honours_mask)
    /// is true. The terminal marker leaves `acc` unchanged.
    pub fn apply(
        self,
        acc: &mut LayerImage,
        operand: &LayerImage,
        mask: Option<&LayerImage>,
    ) -> OpsResult<()> {
        let Some(op) = self.binary_op() else {
            return Ok(());
        };
        let mask = if self.honours_mask() { mask } else { None };
        binary::apply(op, acc, operand, mask)
    }
}

impl std::fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{}", c),
            None => Ok(()),
        }
    }
}
