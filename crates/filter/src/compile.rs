//! Compiles a [`FilterExpression`] into a tree of tagged [`Predicate`]
//! variants, and a [`ResultDescription`] into a list of [`WriteOp`]s.
//!
//! Both compile to data, not closures: a `Predicate` is a plain enum the
//! scan loop matches on once per row, and a `WriteOp` is a plain enum the
//! result writer matches on once per output column. Neither captures a
//! `Row`, so the same compiled filter and writer are reused, read-only,
//! across every worker thread in a scan.

use smallvec::SmallVec;

use tablerace_core::{column, Accessor, ColumnType, Row, Value};

use crate::error::SchemaError;
use crate::expression::{FilterClause, FilterExpression, FilterOp, Mode, Operand};
use crate::result::{ResultDescription, ResultEntry};

/// A numeric comparison direction, for [`Predicate::NumericCompare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Most `in`/`notIn` candidate lists and clause/rule lists are short;
/// inlining a handful of entries avoids a heap allocation for them.
type SmallList<T> = SmallVec<[T; 4]>;

/// A single compiled boolean test, or an aggregation of them.
#[derive(Debug, Clone)]
pub enum Predicate {
    Equal { accessor: Accessor, text: Box<[u8]> },
    NotEqual { accessor: Accessor, text: Box<[u8]> },
    Contains { accessor: Accessor, text: Box<[u8]> },
    NotContains { accessor: Accessor, text: Box<[u8]> },
    InText { accessor: Accessor, texts: SmallList<Box<[u8]>> },
    NotInText { accessor: Accessor, texts: SmallList<Box<[u8]>> },
    InNumber { accessor: Accessor, numbers: SmallList<f64> },
    NotInNumber { accessor: Accessor, numbers: SmallList<f64> },
    NumericCompare { accessor: Accessor, op: CompareOp, value: f64 },
    /// DNF clause, or CNF expression: every child must be true.
    AllOf(SmallList<Predicate>),
    /// CNF clause, or DNF expression: at least one child must be true.
    AnyOf(SmallList<Predicate>),
}

impl Predicate {
    /// Evaluates this predicate against `row`.
    pub fn test(&self, row: &Row) -> bool {
        match self {
            Predicate::Equal { accessor, text } => cell_bytes(row, *accessor).is_some_and(|b| column::equals_case(b, text)),
            Predicate::NotEqual { accessor, text } => cell_bytes(row, *accessor).is_some_and(|b| !column::equals_case(b, text)),
            Predicate::Contains { accessor, text } => cell_bytes(row, *accessor).is_some_and(|b| column::contains_case(b, text)),
            Predicate::NotContains { accessor, text } => cell_bytes(row, *accessor).is_some_and(|b| !column::contains_case(b, text)),
            Predicate::InText { accessor, texts } => {
                cell_bytes(row, *accessor).is_some_and(|b| texts.iter().any(|t| column::equals_case(b, t)))
            }
            Predicate::NotInText { accessor, texts } => {
                cell_bytes(row, *accessor).is_some_and(|b| texts.iter().all(|t| !column::equals_case(b, t)))
            }
            Predicate::InNumber { accessor, numbers } => {
                cell_number(row, *accessor).is_some_and(|v| numbers.iter().any(|n| *n == v))
            }
            Predicate::NotInNumber { accessor, numbers } => {
                cell_number(row, *accessor).is_some_and(|v| numbers.iter().all(|n| *n != v))
            }
            Predicate::NumericCompare { accessor, op, value } => cell_number(row, *accessor).is_some_and(|v| match op {
                CompareOp::Eq => v == *value,
                CompareOp::Ne => v != *value,
                CompareOp::Lt => v < *value,
                CompareOp::Le => v <= *value,
                CompareOp::Gt => v > *value,
                CompareOp::Ge => v >= *value,
            }),
            Predicate::AllOf(children) => children.iter().all(|p| p.test(row)),
            Predicate::AnyOf(children) => children.iter().any(|p| p.test(row)),
        }
    }
}

fn cell_bytes<'a>(row: &'a Row, accessor: Accessor) -> Option<&'a [u8]> {
    row.get_with(accessor).as_bytes()
}

fn cell_number(row: &Row, accessor: Accessor) -> Option<f64> {
    row.get_with(accessor).as_f64()
}

/// A compiled filter, ready to test rows from the table it was compiled
/// against.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    root: Predicate,
}

impl CompiledFilter {
    pub fn test(&self, row: &Row) -> bool {
        self.root.test(row)
    }
}

fn accessor_for<'h>(
    header: &'h tablerace_core::Header,
    column: &str,
) -> Result<(Accessor, &'h tablerace_core::ColumnRecord), SchemaError> {
    let record = header
        .column_by_name(column)
        .ok_or_else(|| SchemaError::UnknownColumn { name: column.to_owned() })?;
    Ok((Accessor::new(record.offset_in_row, record.column_type), record))
}

fn type_name(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Int8 => "int8",
        ColumnType::Uint8 => "uint8",
        ColumnType::Int16 => "int16",
        ColumnType::Uint16 => "uint16",
        ColumnType::Int32 => "int32",
        ColumnType::Uint32 => "uint32",
        ColumnType::Float32 => "float32",
        ColumnType::ByteString(_) => "byteString",
    }
}

fn op_name(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Equal => "equal",
        FilterOp::NotEqual => "notEqual",
        FilterOp::Contains => "contains",
        FilterOp::NotContains => "notContains",
        FilterOp::In => "in",
        FilterOp::NotIn => "notIn",
        FilterOp::LessThan => "lessThan",
        FilterOp::LessOrEqual => "lessOrEqual",
        FilterOp::GreaterThan => "greaterThan",
        FilterOp::GreaterOrEqual => "greaterOrEqual",
    }
}

/// Re-parses a rule's decimal-string operand into an `f64`, per the wire
/// contract (`Rule.value` is always a string; numeric rules re-parse it).
fn parse_number(column: &str, raw: &str) -> Result<f64, SchemaError> {
    raw.parse::<f64>().map_err(|_| SchemaError::InvalidNumber { column: column.to_owned(), value: raw.to_owned() })
}

fn compile_rule(rule: &crate::expression::FilterRule, header: &tablerace_core::Header) -> Result<Predicate, SchemaError> {
    let (accessor, record) = accessor_for(header, &rule.column)?;
    let is_text_column = record.column_type.is_byte_string();

    let type_error = || SchemaError::TypeMismatch {
        column: rule.column.clone(),
        column_type: type_name(record.column_type),
        op: op_name(rule.op),
    };

    // `contains`/`notContains` are text-only; the four comparisons are
    // numeric-only. `equal`/`notEqual`/`in`/`notIn` work on either column
    // type, dispatched below.
    let text_only = matches!(rule.op, FilterOp::Contains | FilterOp::NotContains);
    let numeric_only = matches!(
        rule.op,
        FilterOp::LessThan | FilterOp::LessOrEqual | FilterOp::GreaterThan | FilterOp::GreaterOrEqual
    );
    if (text_only && !is_text_column) || (numeric_only && is_text_column) {
        return Err(type_error());
    }

    let predicate = match (rule.op, &rule.operand) {
        (FilterOp::Equal, Operand::Text(s)) if is_text_column => Predicate::Equal { accessor, text: s.as_bytes().into() },
        (FilterOp::Equal, Operand::Text(s)) => {
            Predicate::NumericCompare { accessor, op: CompareOp::Eq, value: parse_number(&rule.column, s)? }
        }
        (FilterOp::NotEqual, Operand::Text(s)) if is_text_column => Predicate::NotEqual { accessor, text: s.as_bytes().into() },
        (FilterOp::NotEqual, Operand::Text(s)) => {
            Predicate::NumericCompare { accessor, op: CompareOp::Ne, value: parse_number(&rule.column, s)? }
        }
        (FilterOp::Contains, Operand::Text(s)) => Predicate::Contains { accessor, text: s.as_bytes().into() },
        (FilterOp::NotContains, Operand::Text(s)) => Predicate::NotContains { accessor, text: s.as_bytes().into() },
        (FilterOp::In, Operand::TextList(ts)) if is_text_column => {
            Predicate::InText { accessor, texts: ts.iter().map(|t| t.as_bytes().into()).collect() }
        }
        (FilterOp::In, Operand::TextList(ts)) => {
            let numbers: Result<SmallList<f64>, SchemaError> = ts.iter().map(|t| parse_number(&rule.column, t)).collect();
            let numbers = numbers?;
            Predicate::InNumber { accessor, numbers }
        }
        (FilterOp::NotIn, Operand::TextList(ts)) if is_text_column => {
            Predicate::NotInText { accessor, texts: ts.iter().map(|t| t.as_bytes().into()).collect() }
        }
        (FilterOp::NotIn, Operand::TextList(ts)) => {
            let numbers: Result<SmallList<f64>, SchemaError> = ts.iter().map(|t| parse_number(&rule.column, t)).collect();
            let numbers = numbers?;
            Predicate::NotInNumber { accessor, numbers }
        }
        (FilterOp::LessThan, Operand::Text(s)) => {
            Predicate::NumericCompare { accessor, op: CompareOp::Lt, value: parse_number(&rule.column, s)? }
        }
        (FilterOp::LessOrEqual, Operand::Text(s)) => {
            Predicate::NumericCompare { accessor, op: CompareOp::Le, value: parse_number(&rule.column, s)? }
        }
        (FilterOp::GreaterThan, Operand::Text(s)) => {
            Predicate::NumericCompare { accessor, op: CompareOp::Gt, value: parse_number(&rule.column, s)? }
        }
        (FilterOp::GreaterOrEqual, Operand::Text(s)) => {
            Predicate::NumericCompare { accessor, op: CompareOp::Ge, value: parse_number(&rule.column, s)? }
        }
        _ => return Err(type_error()),
    };
    Ok(predicate)
}

fn compile_clause(clause: &FilterClause, header: &tablerace_core::Header, mode: Mode) -> Result<Predicate, SchemaError> {
    let rules: Result<SmallList<Predicate>, SchemaError> = clause.rules.iter().map(|r| compile_rule(r, header)).collect();
    let rules = rules?;
    Ok(match mode {
        Mode::Dnf => Predicate::AllOf(rules),
        Mode::Cnf => Predicate::AnyOf(rules),
    })
}

/// Compiles a [`FilterExpression`] against a table's header into a
/// [`CompiledFilter`].
pub fn compile(expression: &FilterExpression, header: &tablerace_core::Header) -> Result<CompiledFilter, SchemaError> {
    let clauses: Result<SmallList<Predicate>, SchemaError> =
        expression.clauses.iter().map(|c| compile_clause(c, header, expression.mode)).collect();
    let clauses = clauses?;
    // An empty expression has no clauses to disjoin or conjoin; per the
    // filter-identity invariant it must match every row, which `AllOf`
    // over an empty list gives for free (vacuous AND is true) regardless
    // of mode — `AnyOf` over an empty list would instead be vacuously
    // false and match nothing.
    let root = if clauses.is_empty() {
        Predicate::AllOf(clauses)
    } else {
        match expression.mode {
            Mode::Dnf => Predicate::AnyOf(clauses),
            Mode::Cnf => Predicate::AllOf(clauses),
        }
    };
    Ok(CompiledFilter { root })
}

/// One step of writing a matched row into the result table.
#[derive(Debug, Clone, Copy)]
pub enum WriteOp {
    CopyColumn { source: Accessor, dest: Accessor },
    RowIndex { dest: Accessor },
}

/// A compiled [`ResultDescription`], ready to copy matched rows from a
/// source table into a result table.
#[derive(Debug, Clone)]
pub struct CompiledWriter {
    ops: Vec<WriteOp>,
}

impl CompiledWriter {
    /// Writes one matched `source_row` into `dest_row`.
    pub fn write_row(&self, source_row: &Row, dest_row: &Row) {
        for op in &self.ops {
            match *op {
                WriteOp::CopyColumn { source, dest } => {
                    let value = source_row.get_with(source);
                    dest_row.set_with(dest, &value);
                }
                WriteOp::RowIndex { dest } => {
                    dest_row.set_with(dest, &Value::Uint32(source_row.index()));
                }
            }
        }
    }
}

/// Compiles a [`ResultDescription`] against the source and destination
/// headers into a [`CompiledWriter`].
pub fn compile_writer(
    description: &ResultDescription,
    source_header: &tablerace_core::Header,
    dest_header: &tablerace_core::Header,
) -> Result<CompiledWriter, SchemaError> {
    let mut ops = Vec::with_capacity(description.entries.len());
    for entry in &description.entries {
        let dest_name = entry.output_name();
        let (dest_accessor, dest_record) = accessor_for(dest_header, dest_name)?;
        match entry {
            ResultEntry::Column { name, .. } => {
                let (source_accessor, _) = accessor_for(source_header, name)?;
                ops.push(WriteOp::CopyColumn { source: source_accessor, dest: dest_accessor });
            }
            ResultEntry::RowIndex { as_name } => {
                if dest_record.column_type != ColumnType::Uint32 {
                    return Err(SchemaError::TypeMismatch {
                        column: as_name.clone(),
                        column_type: type_name(dest_record.column_type),
                        op: "rowIndex",
                    });
                }
                ops.push(WriteOp::RowIndex { dest: dest_accessor });
            }
        }
    }
    Ok(CompiledWriter { ops })
}
