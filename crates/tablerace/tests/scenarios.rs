//! End-to-end scenarios driving the coordinator exactly the way a caller
//! would: build a source table, describe a filter and a result
//! projection, run a scan, read the result table back.

use tablerace::{config::ScanConfig, coordinator::run};
use tablerace_core::{ColumnDescriptor, ColumnType, Table, Value};
use tablerace_filter::{FilterClause, FilterExpression, FilterOp, FilterRule, Mode, Operand, ResultDescription, ResultEntry};

fn employees() -> Table {
    let columns = vec![
        ColumnDescriptor::new("id", ColumnType::Uint32),
        ColumnDescriptor::new("name", ColumnType::ByteString(31)),
        ColumnDescriptor::new("department", ColumnType::ByteString(15)),
        ColumnDescriptor::new("salary", ColumnType::Float32),
    ];
    let rows: &[(u32, &str, &str, f32)] = &[
        (0, "Ada Lovelace", "Engineering", 142_000.0),
        (1, "Grace Hopper", "Engineering", 151_000.0),
        (2, "Alan Turing", "Research", 138_000.0),
        (3, "Margaret Hamilton", "Engineering", 149_000.0),
        (4, "Katherine Johnson", "Research", 133_000.0),
        (5, "Hedy Lamarr", "Patents", 120_000.0),
    ];
    let table = Table::empty_from_columns(&columns, rows.len() as u32).unwrap();
    table.add_rows(rows.len() as u32).unwrap();
    for (id, name, department, salary) in rows {
        let row = table.get_row_unchecked(*id);
        row.set("id", &Value::Uint32(*id)).unwrap();
        row.set("name", &Value::ByteString(name.as_bytes())).unwrap();
        row.set("department", &Value::ByteString(department.as_bytes())).unwrap();
        row.set("salary", &Value::Float32(*salary)).unwrap();
    }
    table
}

fn ids_in(table: &Table) -> Vec<u32> {
    let mut ids = Vec::new();
    for i in 0..table.row_count() {
        match table.get_row(i).unwrap().get("id").unwrap() {
            Value::Uint32(v) => ids.push(v),
            other => panic!("expected Uint32, got {other:?}"),
        }
    }
    ids.sort_unstable();
    ids
}

/// A single-clause DNF equality filter, projecting a subset of columns.
#[test]
fn equality_filter_projects_matching_rows() {
    let source = employees();
    let filter = FilterExpression::new(
        Mode::Dnf,
        vec![FilterClause::new(vec![FilterRule::new("department", FilterOp::Equal, Operand::Text("Engineering".into()))])],
    );
    let description = ResultDescription::new(vec![ResultEntry::column("id"), ResultEntry::column("name")]);
    let scan = run(&source, &filter, &description, ScanConfig::default()).unwrap();

    assert_eq!(ids_in(&scan.table), vec![0, 1, 3]);
}

/// DNF: two clauses OR'd together, each an AND of its rules.
#[test]
fn dnf_matches_either_clause() {
    let source = employees();
    let filter = FilterExpression::new(
        Mode::Dnf,
        vec![
            FilterClause::new(vec![
                FilterRule::new("department", FilterOp::Equal, Operand::Text("Research".into())),
                FilterRule::new("salary", FilterOp::LessThan, Operand::number(135_000.0)),
            ]),
            FilterClause::new(vec![FilterRule::new("department", FilterOp::Equal, Operand::Text("Patents".into()))]),
        ],
    );
    let description = ResultDescription::new(vec![ResultEntry::column("id")]);
    let scan = run(&source, &filter, &description, ScanConfig::default()).unwrap();

    // Research+salary<135000 -> Katherine Johnson (4); Patents -> Hedy Lamarr (5).
    assert_eq!(ids_in(&scan.table), vec![4, 5]);
}

/// CNF: two clauses AND'd together, each an OR of its rules.
#[test]
fn cnf_requires_every_clause() {
    let source = employees();
    let filter = FilterExpression::new(
        Mode::Cnf,
        vec![
            FilterClause::new(vec![FilterRule::new("department", FilterOp::Equal, Operand::Text("Engineering".into()))]),
            FilterClause::new(vec![FilterRule::new("salary", FilterOp::GreaterOrEqual, Operand::number(149_000.0))]),
        ],
    );
    let description = ResultDescription::new(vec![ResultEntry::column("id")]);
    let scan = run(&source, &filter, &description, ScanConfig::default()).unwrap();

    // Engineering AND salary>=149000 -> Grace Hopper (1), Margaret Hamilton (3).
    assert_eq!(ids_in(&scan.table), vec![1, 3]);
}

/// `in`/`notIn` against a candidate list on a text column.
#[test]
fn in_text_and_not_in_text_are_complements() {
    let source = employees();
    let candidates = Operand::TextList(vec!["Engineering".into(), "Patents".into()]);

    let in_filter = FilterExpression::new(
        Mode::Dnf,
        vec![FilterClause::new(vec![FilterRule::new("department", FilterOp::In, candidates.clone())])],
    );
    let not_in_filter = FilterExpression::new(
        Mode::Dnf,
        vec![FilterClause::new(vec![FilterRule::new("department", FilterOp::NotIn, candidates)])],
    );
    let description = ResultDescription::new(vec![ResultEntry::column("id")]);

    let in_scan = run(&source, &in_filter, &description, ScanConfig::default()).unwrap();
    let not_in_scan = run(&source, &not_in_filter, &description, ScanConfig::default()).unwrap();

    let mut combined: Vec<u32> = ids_in(&in_scan.table).into_iter().chain(ids_in(&not_in_scan.table)).collect();
    combined.sort_unstable();
    assert_eq!(combined, vec![0, 1, 2, 3, 4, 5]);
    assert!(ids_in(&in_scan.table).iter().all(|id| !ids_in(&not_in_scan.table).contains(id)));
}

/// A result description that includes the matched row's source index
/// alongside projected columns.
#[test]
fn result_description_can_include_row_index() {
    let source = employees();
    let filter = FilterExpression::new(
        Mode::Dnf,
        vec![FilterClause::new(vec![FilterRule::new("department", FilterOp::Equal, Operand::Text("Patents".into()))])],
    );
    let description = ResultDescription::new(vec![ResultEntry::row_index("sourceIndex"), ResultEntry::column("name")]);
    let scan = run(&source, &filter, &description, ScanConfig::default()).unwrap();

    assert_eq!(scan.table.row_count(), 1);
    let row = scan.table.get_row(0).unwrap();
    assert_eq!(row.get("sourceIndex").unwrap(), Value::Uint32(5));
    assert_eq!(row.get("name").unwrap(), Value::ByteString(b"Hedy Lamarr"));
}

/// A filter referencing a column that doesn't exist is a schema error,
/// not a panic.
#[test]
fn unknown_filter_column_is_reported_as_a_schema_error() {
    let source = employees();
    let filter = FilterExpression::new(
        Mode::Dnf,
        vec![FilterClause::new(vec![FilterRule::new("nonexistent", FilterOp::Equal, Operand::Text("x".into()))])],
    );
    let description = ResultDescription::new(vec![ResultEntry::column("id")]);
    let err = run(&source, &filter, &description, ScanConfig::default()).unwrap_err();
    assert!(matches!(err, tablerace::ScanError::Schema(_)));
}
