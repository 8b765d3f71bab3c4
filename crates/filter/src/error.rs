//! Errors raised while compiling a [`FilterExpression`](crate::expression::FilterExpression)
//! or [`ResultDescription`](crate::result::ResultDescription) against a
//! table schema.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no column named {name:?}")]
    UnknownColumn { name: String },
    #[error("column {column:?} (type {column_type}) cannot be compared with {op}")]
    TypeMismatch {
        column: String,
        column_type: &'static str,
        op: &'static str,
    },
    #[error("value {value:?} for column {column:?} is not a valid decimal number")]
    InvalidNumber { column: String, value: String },
    #[error("a row-index result entry (empty column name) must specify \"as\"")]
    MissingRowIndexName,
    #[error("duplicate result column name {name:?}")]
    DuplicateResultColumn { name: String },
}
