//! Benchmarks for TableStore lookup and scan paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashbrown::HashMap;
use tabula_core::schema::Column;
use tabula_core::{DataType, Value};
use tabula_storage::TableStore;

fn create_store() -> TableStore {
    let columns = vec![
        Column::new("id", DataType::Auto).unwrap(),
        Column::new("symbol", DataType::String).unwrap(),
        Column::new("sector", DataType::String).unwrap(),
        Column::new("price", DataType::Number).unwrap(),
    ];
    TableStore::new("quotes".into(), columns, Some(0), HashMap::new()).unwrap()
}

fn populate(store: &mut TableStore, count: usize) {
    let sectors = ["Tech", "Finance", "Health", "Energy", "Consumer"];
    for i in 0..count {
        store
            .add_row(vec![
                Value::Null,
                Value::String(format!("SYM{}", i)),
                Value::String(sectors[i % sectors.len()].into()),
                Value::Number(100.0 + i as f64 * 0.1),
            ])
            .unwrap();
    }
}

fn pk_lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pk_lookup");

    for row_count in [1_000usize, 10_000, 100_000].iter() {
        let mut store = create_store();
        populate(&mut store, *row_count);

        group.bench_with_input(
            BenchmarkId::from_parameter(row_count),
            row_count,
            |b, &row_count| {
                b.iter(|| {
                    let key = Value::Number((row_count / 2) as f64);
                    black_box(store.find_pk(black_box(&key)))
                })
            },
        );
    }

    group.finish();
}

fn column_scan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_scan");

    for row_count in [1_000usize, 10_000, 100_000].iter() {
        let mut store = create_store();
        populate(&mut store, *row_count);
        let sector = store.column_index("sector").unwrap();

        group.bench_with_input(
            BenchmarkId::new("all_matches", row_count),
            row_count,
            |b, _| {
                let key = Value::String("Tech".into());
                b.iter(|| black_box(store.find_by(sector, black_box(&key), 0)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("first_match", row_count),
            row_count,
            |b, _| {
                let key = Value::String("Tech".into());
                b.iter(|| black_box(store.find_by(sector, black_box(&key), 1)))
            },
        );
    }

    group.finish();
}

fn scan_with_tombstones_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_with_tombstones");

    let row_count = 50_000usize;
    let mut store = create_store();
    populate(&mut store, row_count);
    for position in (0..row_count).step_by(2) {
        store.delete_row(position);
    }
    let sector = store.column_index("sector").unwrap();

    group.bench_function("half_deleted", |b| {
        let key = Value::String("Finance".into());
        b.iter(|| black_box(store.find_by(sector, black_box(&key), 0)))
    });

    group.finish();
}

criterion_group!(
    benches,
    pk_lookup_benchmark,
    column_scan_benchmark,
    scan_with_tombstones_benchmark
);
criterion_main!(benches);
