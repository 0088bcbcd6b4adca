//! 도메인 타입 벤치마크
//!
//! 엔트리 정규화, 직렬화, 조회 정렬 성능을 측정합니다.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sentryedge_core::pipeline::sort_and_page;
use sentryedge_core::types::{LogEntry, LogQuery, StoredLog};

fn create_rows(n: u64) -> Vec<StoredLog> {
    (0..n)
        .map(|i| StoredLog {
            id: i,
            entry: LogEntry::new(
                "api",
                if i % 3 == 0 { "error" } else { "info" },
                format!("request {i} processed"),
                format!("2024-01-15T12:{:02}:{:02}.000Z", (i / 60) % 60, i % 60),
            ),
        })
        .collect()
}

fn bench_entry_new(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_entry");
    group.throughput(Throughput::Elements(1));
    group.bench_function("new_normalized", |b| {
        b.iter(|| {
            LogEntry::new(
                black_box(" Payment-Service "),
                black_box("ERROR"),
                black_box("critical failure in charge processor"),
                black_box("2024-01-15T12:00:00.000Z"),
            )
        })
    });

    let entry = LogEntry::new("api", "info", "GET /index.html 200", "2024-01-15T12:00:00.000Z");
    group.bench_function("serialize_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&entry)).unwrap())
    });
    group.finish();
}

fn bench_sort_and_page(c: &mut Criterion) {
    let rows = create_rows(10_000);
    let query = LogQuery {
        limit: 50,
        offset: 100,
        ..Default::default()
    };

    let mut group = c.benchmark_group("query");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("sort_and_page_10k", |b| {
        b.iter(|| sort_and_page(black_box(rows.clone()), black_box(&query)))
    });
    group.finish();
}

criterion_group!(benches, bench_entry_new, bench_sort_and_page);
criterion_main!(benches);
