//! Sentence parser.
//!
//! # Grammar
//!
//! ```text
//! sentence  := group (';' group)*
//! group     := [targets '='] expression
//! targets   := target (',' target)*
//! target    := index | [index] ':' [index]
//! expression:= index (operator index)*
//! operator  := '+' | '-' | '*' | '/' | '&' | '|' | '^' | '$'
//! ```
//!
//! Whitespace is ignored everywhere. Without a target list the group writes
//! into its first operand. A range with no end runs to the last layer.
//!
//! Parsing is tolerant: operand and target indices past the last layer,
//! malformed target tokens, and operator characters with no operand before
//! them are dropped instead of failing the parse. [`ParseDiagnostics`]
//! counts what was dropped. Only an empty sentence or a group whose
//! expression ends up with no operand is an error.
//!
//! ```rust
//! use strata_arith::parse_sentence;
//!
//! let parsed = parse_sentence("10:12 = 11+12-10*5; 3^4", 100).unwrap();
//! assert_eq!(parsed.groups.len(), 2);
//! assert_eq!(parsed.groups[0].to_string(), "10,11,12=11+12-10*5");
//! assert_eq!(parsed.groups[1].to_string(), "3=3^4");
//! ```

use crate::{ArithError, ArithResult, ArithmeticOperator, Operation, OperationGroup};
use std::collections::BTreeSet;
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

/// Counters of items dropped by tolerant parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseDiagnostics {
    /// Operands past the last layer (or too large to be an index).
    pub dropped_operands: usize,
    /// Target tokens that were out of range, reversed or malformed.
    pub dropped_targets: usize,
    /// Operator or unknown characters with no operand before them.
    pub skipped_symbols: usize,
}

impl ParseDiagnostics {
    /// Total number of dropped items.
    pub fn total(&self) -> usize {
        self.dropped_operands + self.dropped_targets + self.skipped_symbols
    }

    /// Returns `true` if nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

/// Groups compiled from a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parsed {
    /// Groups in declaration order
    pub groups: Vec<OperationGroup>,
    /// What tolerant parsing dropped
    pub diagnostics: ParseDiagnostics,
}

/// Compiles `sentence` against a stack whose last layer is `last_layer_index`.
///
/// # Errors
///
/// - [`ArithError::EmptySentence`] if there is no group text at all
/// - [`ArithError::EmptyExpression`] if any group has no operand
pub fn parse_sentence(sentence: &str, last_layer_index: u32) -> ArithResult<Parsed> {
    trace!(sentence, last_layer_index, "parser::parse_sentence");

    let compact: String = sentence.chars().filter(|c| !c.is_whitespace()).collect();

    let mut diagnostics = ParseDiagnostics::default();
    let mut groups = Vec::new();

    for (index, text) in compact.split(';').filter(|s| !s.is_empty()).enumerate() {
        let group = parse_group(text, last_layer_index, &mut diagnostics)
            .ok_or(ArithError::EmptyExpression { group: index })?;
        debug!(index, group = %group, "parsed group");
        groups.push(group);
    }

    if groups.is_empty() {
        return Err(ArithError::EmptySentence);
    }

    if !diagnostics.is_clean() {
        warn!(
            dropped_operands = diagnostics.dropped_operands,
            dropped_targets = diagnostics.dropped_targets,
            skipped_symbols = diagnostics.skipped_symbols,
            "sentence had ignored items"
        );
    }

    Ok(Parsed {
        groups,
        diagnostics,
    })
}

fn parse_group(text: &str, last: u32, diag: &mut ParseDiagnostics) -> Option<OperationGroup> {
    let (target_text, expression) = match text.split_once('=') {
        Some((targets, expression)) => (Some(targets), expression),
        None => (None, text),
    };

    let operations = parse_expression(expression, last, diag);
    let first = operations.first()?.layer;

    let targets = match target_text {
        Some(t) if !t.is_empty() => parse_targets(t, last, diag),
        _ => BTreeSet::from([first]),
    };

    Some(OperationGroup::new(targets, operations))
}

fn parse_expression(expression: &str, last: u32, diag: &mut ParseDiagnostics) -> Vec<Operation> {
    let mut operations = Vec::new();
    let mut digits = String::new();

    let mut emit = |digits: &str, operator: ArithmeticOperator, diag: &mut ParseDiagnostics| {
        match digits.parse::<u32>() {
            Ok(layer) if layer <= last => operations.push(Operation::new(layer, operator)),
            _ => diag.dropped_operands += 1,
        }
    };

    for c in expression.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        match ArithmeticOperator::from_symbol(c) {
            Some(operator) if !digits.is_empty() => {
                emit(&digits, operator, diag);
                digits.clear();
            }
            Some(_) => diag.skipped_symbols += 1,
            // An unknown symbol ends the run; its digits have no operator.
            None => {
                if !digits.is_empty() {
                    diag.dropped_operands += 1;
                    digits.clear();
                }
                diag.skipped_symbols += 1;
            }
        }
    }

    if !digits.is_empty() {
        emit(&digits, ArithmeticOperator::None, diag);
    }

    operations
}

fn parse_targets(text: &str, last: u32, diag: &mut ParseDiagnostics) -> BTreeSet<u32> {
    let mut targets = BTreeSet::new();

    for token in text.split(',').filter(|t| !t.is_empty()) {
        match token.split_once(':') {
            Some((start, end)) => {
                let start = if start.is_empty() { Ok(0) } else { start.parse::<u32>() };
                let end = if end.is_empty() { Ok(last) } else { end.parse::<u32>() };
                match (start, end) {
                    (Ok(start), Ok(end)) if start <= end.min(last) => {
                        targets.extend(start..=end.min(last));
                    }
                    _ => diag.dropped_targets += 1,
                }
            }
            None => match token.parse::<u32>() {
                Ok(index) if index <= last => {
                    targets.insert(index);
                }
                _ => diag.dropped_targets += 1,
            },
        }
    }

    targets
}
