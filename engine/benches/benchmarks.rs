//! Performance benchmarks for tabula-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use tabula_engine::{records_from_json, Config, Cursor, Record, SchemaDiscoverer, StatementHandle};

fn create_test_records(count: usize) -> Vec<Record> {
    let rows: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "id": format!("rec{}", i),
                "createdTime": "2024-05-01T08:00:00.000Z",
                "fields": {
                    "Name": format!("User {}", i),
                    "Age": i % 90,
                    "Active": i % 3 == 0,
                    "Score": i as f64 / 7.0,
                    "Tags": ["a", "b"]
                }
            })
        })
        .collect();
    records_from_json(json!(rows), &Config::default()).unwrap()
}

fn bench_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery");
    let config = Config::default();
    let records = create_test_records(1);

    group.bench_function("discover_wrapped", |b| {
        let discoverer = SchemaDiscoverer::new(&config);
        b.iter(|| discoverer.discover(black_box(records.first())))
    });

    group.bench_function("records_from_json", |b| {
        let raw = json!([{
            "id": "rec1",
            "createdTime": "2024-05-01T08:00:00.000Z",
            "fields": {"Name": "Ada", "Age": 36, "Tags": ["x"]}
        }]);
        b.iter(|| records_from_json(black_box(raw.clone()), &config))
    });

    group.finish();
}

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("scan_by_name", size), size, |b, &size| {
            let records = create_test_records(size);
            b.iter(|| {
                let mut cursor = Cursor::new(records.clone(), StatementHandle::new());
                let mut total = 0i64;
                while cursor.advance() {
                    total += cursor.get_long(black_box("Age")).unwrap_or(0);
                }
                total
            })
        });

        group.bench_with_input(
            BenchmarkId::new("scan_by_position", size),
            size,
            |b, &size| {
                let records = create_test_records(size);
                b.iter(|| {
                    let mut cursor = Cursor::new(records.clone(), StatementHandle::new());
                    let mut total = 0i64;
                    while cursor.advance() {
                        total += cursor.get_long(black_box(4usize)).unwrap_or(0);
                    }
                    total
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_discovery, bench_cursor);
criterion_main!(benches);
