//! Benchmarks for the filter engine
//!
//! Run with: cargo bench --package pipeline
//!
//! Measures the coordination overhead of fan-out/fan-in with a predicate
//! that does no I/O, unbounded and with a concurrency cap.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pipeline::{EngineConfig, FilterEngine, PredicateError, predicate_fn};
use std::sync::Arc;

fn build_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime")
}

fn bench_filter(c: &mut Criterion) {
    let runtime = build_runtime();
    let mut group = c.benchmark_group("filter_engine");

    for &size in &[10usize, 100, 1_000] {
        for (label, config) in [
            ("unbounded", EngineConfig::default()),
            ("capped_16", EngineConfig::default().with_max_concurrency(16)),
        ] {
            let engine = FilterEngine::new(config);
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &size| {
                b.iter(|| {
                    let predicate = Arc::new(predicate_fn("even", |n: &usize| {
                        let n = *n;
                        async move { Ok::<_, PredicateError>(n % 2 == 0) }
                    }));
                    let items: Vec<usize> = (0..size).collect();
                    let report = runtime
                        .block_on(engine.filter(black_box(items), predicate))
                        .expect("filter failed");
                    black_box(report)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
