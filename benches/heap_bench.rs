//! Benchmarks for the indexed heap, the owner-group queue, and the
//! end-to-end dispatch loop.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::runtime::Runtime;

use priority_action_queue::core::{
    ActionDispatcher, ActionMetadata, ActionQueue, AppResult, IndexedHeap, Orchestrator,
    QueuedAction,
};
use priority_action_queue::runtime::TokioSpawner;

#[derive(Clone)]
struct NoopDispatcher;

#[async_trait]
impl ActionDispatcher for NoopDispatcher {
    async fn dispatch(&self, action: &str, _args: &[Value]) -> AppResult<Value> {
        Ok(json!(action))
    }
}

fn weight_heap() -> IndexedHeap<u64, i64, fn(&i64, &i64) -> std::cmp::Ordering> {
    IndexedHeap::new(|a: &i64, b: &i64| a.cmp(b))
}

// ============================================================================
// Indexed heap benchmarks
// ============================================================================

fn bench_heap_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_push_pop");

    for size in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = weight_heap();
                for i in 0..size {
                    // Pseudo-random weights without an RNG in the hot loop.
                    heap.push(i, ((i * 2_654_435_761) % 100_000) as i64);
                }
                while let Some(weight) = heap.pop() {
                    black_box(weight);
                }
            });
        });
    }
    group.finish();
}

fn bench_heap_reposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_reposition");

    for size in [100u64, 1_000, 5_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut heap = weight_heap();
                for i in 0..size {
                    heap.push(i, i as i64);
                }
                // Every item gets a new weight and an arbitrary-position update.
                for i in 0..size {
                    if let Some(weight) = heap.get_mut(&i) {
                        *weight = (size - i) as i64;
                    }
                    heap.reposition(&i);
                }
                black_box(heap.pop());
            });
        });
    }
    group.finish();
}

// ============================================================================
// Owner-group queue benchmarks
// ============================================================================

fn bench_queue_grouped_enqueue_dequeue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_grouped_enqueue_dequeue");

    for size in [100u64, 1_000, 5_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut queue = ActionQueue::new();
                // Actions spread over 16 owners with mixed priorities.
                for i in 0..size {
                    let owner = format!("owner-{}", i % 16);
                    let (action, _rx) =
                        QueuedAction::new(format!("action-{i}"), vec![json!(i)]);
                    queue.enqueue(ActionMetadata::new(owner, (i % 5) as i32), action);
                }
                while let Some(action) = queue.dequeue() {
                    black_box(action.name().len());
                }
            });
        });
    }
    group.finish();
}

// ============================================================================
// End-to-end scheduling benchmark
// ============================================================================

fn bench_orchestrator_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("orchestrator_end_to_end");

    for size in [100u64, 500] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.to_async(Runtime::new().unwrap()).iter(|| async move {
                let scheduler =
                    Orchestrator::new(NoopDispatcher, TokioSpawner::current());
                let mut handles = Vec::with_capacity(size as usize);
                for i in 0..size {
                    let owner = format!("owner-{}", i % 8);
                    handles.push(scheduler.enqueue(
                        ActionMetadata::new(owner, (i % 5) as i32),
                        format!("action-{i}"),
                        vec![],
                    ));
                }
                for handle in handles {
                    black_box(handle.wait().await.unwrap());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(heap_benches, bench_heap_push_pop, bench_heap_reposition);
criterion_group!(queue_benches, bench_queue_grouped_enqueue_dequeue);
criterion_group!(scheduler_benches, bench_orchestrator_end_to_end);

criterion_main!(heap_benches, queue_benches, scheduler_benches);
