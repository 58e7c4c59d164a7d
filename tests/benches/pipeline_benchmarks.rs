//! # Quantum-Vault Pipeline Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Quantum payment, clean channel | < 1ms per run |
//! | Quantum payment, intercepted | < 1ms per run |
//! | Ballot cast | < 1ms per run |
//! | Payload seal + open | < 50μs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

use qv_05_transaction_pipeline::{open_payload, seal_payload, OperationPayload, TransactionPipelineApi};
use qv_06_vote_casting::VoteCastingApi;
use qv_tests::fixtures::{open_election, payment_to_alice, HarnessBuilder};
use shared_types::NullSink;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("benchmark runtime")
}

// ============================================================================
// TRANSACTION PIPELINE
// ============================================================================

fn bench_transaction_pipeline(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("qv-05-transaction-pipeline");

    for (label, qber) in [("clean", 0.02), ("intercepted", 0.2)] {
        let h = HarnessBuilder::new().fixed_qber(qber).build();
        group.bench_function(BenchmarkId::new("quantum_payment", label), |b| {
            b.iter(|| {
                rt.block_on(async {
                    let result = h
                        .container
                        .transactions
                        .process_transaction(payment_to_alice(), &mut NullSink)
                        .await;
                    black_box(result.is_ok())
                })
            })
        });
    }

    group.finish();
}

fn bench_payload_sealing(c: &mut Criterion) {
    let rt = runtime();
    let h = HarnessBuilder::new().fixed_qber(0.02).build();
    let record = rt
        .block_on(
            h.container
                .transactions
                .process_transaction(payment_to_alice(), &mut NullSink),
        )
        .expect("clean run");
    let key = rt
        .block_on(h.container.transactions.key_for(&record.transaction_id))
        .expect("key lookup")
        .expect("committed key");
    let payload = OperationPayload::from_request(&record.transaction_id, &payment_to_alice());

    let mut group = c.benchmark_group("shared-crypto");
    group.throughput(Throughput::Elements(1));
    group.bench_function("seal_open_payload", |b| {
        b.iter(|| {
            let sealed = seal_payload(&key, black_box(&payload)).expect("seal");
            black_box(open_payload(&key, &record.transaction_id, &sealed).expect("open"))
        })
    });
    group.finish();
}

// ============================================================================
// VOTE CASTING
// ============================================================================

fn bench_vote_casting(c: &mut Criterion) {
    let rt = runtime();
    let h = HarnessBuilder::new().fixed_qber(0.02).build();
    rt.block_on(
        h.container
            .votes
            .register_election(open_election("bench", &["a", "b"])),
    )
    .expect("election");

    c.bench_function("qv-06-cast_vote", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(h.container.votes.cast_vote("bench", "a", false).await.is_ok())
            })
        })
    });
}

criterion_group!(
    benches,
    bench_transaction_pipeline,
    bench_payload_sealing,
    bench_vote_casting
);
criterion_main!(benches);
