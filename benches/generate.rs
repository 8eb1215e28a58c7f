//! Performance benchmarks for decoy-honeypot
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use decoy_honeypot::{generate, DataCategory, RowStreamEngine, RuntimeConfig, StreamConfigUpdate};
use futures::StreamExt;
use std::sync::Arc;

fn bench_generate(c: &mut Criterion) {
    for category in DataCategory::CONCRETE
        .iter()
        .copied()
        .chain([DataCategory::Mixed])
    {
        c.bench_function(&format!("generate {}", category), |b| {
            let mut seed = 0i64;
            b.iter(|| {
                seed += 1;
                generate(black_box(seed), category)
            });
        });
    }
}

fn bench_stream_rows(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = Arc::new(RuntimeConfig::default());
    config
        .set_stream_config(StreamConfigUpdate::default().max_rows(1_000).delay_ms(0))
        .unwrap();
    let engine = RowStreamEngine::new(config);

    c.bench_function("stream 1000 rows", |b| {
        b.to_async(&rt)
            .iter(|| async { engine.stream_rows(black_box(1)).count().await });
    });
}

criterion_group!(benches, bench_generate, bench_stream_rows);
criterion_main!(benches);
