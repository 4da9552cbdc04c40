//! # strata-arith
//!
//! Cross-layer pixel arithmetic for resin slice stacks.
//!
//! A sentence such as
//!
//! ```text
//! 10,11,12 = 11 + 12 - 10 * 5
//! ```
//!
//! means "take layer 11, add layer 12, subtract layer 10, multiply by
//! layer 5, and write the result into layers 10, 11 and 12". Several
//! statements can be chained with `;` and run in order.
//!
//! # Pipeline
//!
//! ```text
//! sentence ──► parse_sentence ──► Vec<OperationGroup> ──► Executor ──► LayerStore
//!                  │                                         │
//!                  └─ ParseDiagnostics                       └─ Progress (pause/cancel)
//! ```
//!
//! - [`parser`] - Tolerant sentence parser
//! - [`group`] - [`Operation`] and [`OperationGroup`]
//! - [`operator`] - [`ArithmeticOperator`] and its pixel semantics
//! - [`executor`] - Sequential fold, parallel broadcast
//! - [`store`] - [`LayerStore`] trait and [`MemoryLayerStore`]
//! - [`progress`] - [`Progress`] handle
//! - [`arithmetic`] - [`LayerArithmetic`], the operation a host drives
//!
//! # Feature Flags
//!
//! - `serde` - Serialize/deserialize operators, operations and groups

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod arithmetic;
pub mod executor;
pub mod group;
pub mod operator;
pub mod parser;
pub mod progress;
pub mod store;

pub use arithmetic::LayerArithmetic;
pub use error::{ArithError, ArithResult};
pub use executor::{ExecutionStatus, Executor, ExecutorConfig};
pub use group::{Operation, OperationGroup};
pub use operator::ArithmeticOperator;
pub use parser::{parse_sentence, ParseDiagnostics, Parsed};
pub use progress::Progress;
pub use store::{LayerStore, MemoryLayerStore};
