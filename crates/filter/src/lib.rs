//! Boolean filter expression compilation: turns a [`FilterExpression`]
//! into a tree of tagged [`compile::Predicate`] variants the scan loop
//! evaluates per row, and a [`ResultDescription`] into a [`compile::CompiledWriter`]
//! that copies matched rows into the result table.

pub mod compile;
pub mod error;
pub mod expression;
pub mod result;

pub use compile::{compile, compile_writer, CompareOp, CompiledFilter, CompiledWriter, Predicate, WriteOp};
pub use error::SchemaError;
pub use expression::{FilterClause, FilterExpression, FilterOp, FilterRule, Mode, Operand};
pub use result::{ResultDescription, ResultEntry};
