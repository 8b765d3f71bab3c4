//! Benchmarks the coordinated parallel scan against a synthetic table,
//! across a few worker-pool sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tablerace::{config::ScanConfig, coordinator::run};
use tablerace_core::{ColumnDescriptor, ColumnType, Table, Value};
use tablerace_filter::{FilterClause, FilterExpression, FilterOp, FilterRule, Mode, Operand, ResultDescription, ResultEntry};

const ROW_COUNT: u32 = 200_000;

fn build_source() -> Table {
    let columns = vec![
        ColumnDescriptor::new("id", ColumnType::Uint32),
        ColumnDescriptor::new("city", ColumnType::ByteString(15)),
    ];
    let table = Table::empty_from_columns(&columns, ROW_COUNT).unwrap();
    table.add_rows(ROW_COUNT).unwrap();
    let cities = ["Boston", "Austin", "Denver", "Chicago", "Seattle"];
    for i in 0..ROW_COUNT {
        let row = table.get_row_unchecked(i);
        row.set("id", &Value::Uint32(i)).unwrap();
        row.set("city", &Value::ByteString(cities[i as usize % cities.len()].as_bytes())).unwrap();
    }
    table
}

fn bench_scan(c: &mut Criterion) {
    let source = build_source();
    let filter = FilterExpression::new(
        Mode::Dnf,
        vec![FilterClause::new(vec![FilterRule::new("city", FilterOp::Equal, Operand::Text("Boston".into()))])],
    );
    let description = ResultDescription::new(vec![ResultEntry::column("id")]);

    let mut group = c.benchmark_group("scan");
    for worker_count in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(worker_count), &worker_count, |b, &worker_count| {
            let config = ScanConfig::builder().worker_count(worker_count).row_batch_size(512).build();
            b.iter(|| run(&source, &filter, &description, config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
