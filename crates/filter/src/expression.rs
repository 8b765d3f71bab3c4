//! The boolean filter expression model: a flat two-level structure of
//! clauses and rules, aggregated either as disjunctive or conjunctive
//! normal form.
//!
//! In DNF, a clause is an AND of rules ("all of") and the expression is an
//! OR of clauses ("any of"); in CNF, a clause is an OR of rules ("any of")
//! and the expression is an AND of clauses ("all of"). This is the
//! mathematically standard meaning of both forms — see
//! [`crate::compile::compile`] for where that aggregation is built.

use serde::{Deserialize, Serialize};

/// How an expression's clauses, and each clause's rules, aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// clause = AND(rules), expression = OR(clauses)
    Dnf,
    /// clause = OR(rules), expression = AND(clauses)
    Cnf,
}

/// A single rule's comparison operator. `contains`/`notContains` only
/// apply to text columns; `lessThan`/`lessOrEqual`/`greaterThan`/
/// `greaterOrEqual` only apply to numeric columns. `equal`/`notEqual`/
/// `in`/`notIn` apply to either, dispatched on the target column's type
/// at compile time (see [`crate::compile::compile`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOp {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    In,
    NotIn,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl FilterOp {
    /// Whether this operator compares against a single value (`true`) or
    /// a list of candidate values (`false`).
    pub fn is_scalar(self) -> bool {
        !matches!(self, FilterOp::In | FilterOp::NotIn)
    }
}

/// The right-hand side of a [`FilterRule`]: always a decimal string or a
/// list of decimal strings on the wire, per `Rule.value`. Numeric rules
/// are re-parsed from their string form (`str::parse::<f64>`) when the
/// rule compiles against a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Text(String),
    TextList(Vec<String>),
}

impl Operand {
    /// Builds a scalar operand from a number, formatted the way it will
    /// be re-parsed (`str::parse::<f64>`) at compile time.
    pub fn number(value: f64) -> Self {
        Operand::Text(value.to_string())
    }

    /// Builds a list operand from numbers, one decimal string per value.
    pub fn number_list(values: impl IntoIterator<Item = f64>) -> Self {
        Operand::TextList(values.into_iter().map(|v| v.to_string()).collect())
    }
}

/// One column comparison: `column <op> operand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub column: String,
    pub op: FilterOp,
    pub operand: Operand,
}

impl FilterRule {
    pub fn new(column: impl Into<String>, op: FilterOp, operand: Operand) -> Self {
        Self { column: column.into(), op, operand }
    }
}

/// A clause: a list of rules, aggregated per the enclosing expression's
/// [`Mode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub rules: Vec<FilterRule>,
}

impl FilterClause {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }
}

/// A complete filter: a [`Mode`] plus the clauses it aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub mode: Mode,
    pub clauses: Vec<FilterClause>,
}

impl FilterExpression {
    pub fn new(mode: Mode, clauses: Vec<FilterClause>) -> Self {
        Self { mode, clauses }
    }
}
