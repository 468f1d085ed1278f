//! Benchmarks for the stage runner
//!
//! Measures dispatch and join overhead for a batch of trivial operations at
//! several concurrency caps on both backends.

use std::sync::Arc;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vs_core::{StageKind, WorkItem};
use vs_pipeline::{ExecutionBackend, StageOperation, StageOutput, StageRunner, UnitId};

const BATCH: usize = 64;

/// Operation that only touches the item.
struct NoopOp;

#[async_trait]
impl StageOperation for NoopOp {
    fn stage(&self) -> StageKind {
        StageKind::Sentiment
    }

    async fn run(&self, item: &mut WorkItem, _unit: UnitId) -> vs_core::Result<StageOutput> {
        tokio::task::yield_now().await;
        Ok(StageOutput::new(item.source().len().to_string()))
    }
}

fn batch() -> Vec<WorkItem> {
    (0..BATCH)
        .map(|i| WorkItem::new(format!("https://example.com/watch?v={i}")))
        .collect()
}

fn bench_backend(c: &mut Criterion, name: &str, backend: ExecutionBackend) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();
    let op: Arc<dyn StageOperation> = Arc::new(NoopOp);

    let mut group = c.benchmark_group(name);
    for cap in [1usize, 4, 16, BATCH] {
        let runner = StageRunner::new()
            .with_cap(Some(cap))
            .with_backend(backend);
        group.bench_with_input(BenchmarkId::from_parameter(cap), &cap, |b, _| {
            b.iter(|| {
                let mut items = batch();
                let report = rt
                    .block_on(runner.run(&mut items, Arc::clone(&op)))
                    .unwrap();
                black_box(report.succeeded)
            })
        });
    }
    group.finish();
}

fn bench_tasks(c: &mut Criterion) {
    bench_backend(c, "stage_runner_tasks", ExecutionBackend::Tasks);
}

fn bench_cooperative(c: &mut Criterion) {
    bench_backend(c, "stage_runner_cooperative", ExecutionBackend::Cooperative);
}

criterion_group!(benches, bench_tasks, bench_cooperative);
criterion_main!(benches);
