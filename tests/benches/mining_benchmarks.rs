//! # Provenance-Chain Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Hashing | SHA-256d over a block preimage |
//! | Mining | Nonce search across difficulties and thread counts |
//! | Validation | Full-chain integrity pass |
//! | Simulation | End-to-end run |

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pc_01_ledger::utils::hashing::{hash_with_nonce, serialize_block_prefix};
use pc_01_ledger::{validate_blocks, MiningConfig, PoWMiner};
use shared_types::{ActorId, BlockHash, ProductId, Transaction};
use sim_runtime::{run_simulation, BatchPolicy};
use std::time::Duration;

fn sample_transactions(count: usize) -> Vec<Transaction> {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap().naive_utc();
    (0..count)
        .map(|i| {
            Transaction::created(
                ProductId::new(format!("PRD-{:04}", i + 1)).unwrap(),
                "Supplier_1",
                ActorId::new("Supplier_1").unwrap(),
                at,
            )
            .unwrap()
        })
        .collect()
}

// ============================================================================
// Hashing
// ============================================================================

fn bench_block_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("block-hashing");
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

    for size in [1, 10, 100] {
        let prefix =
            serialize_block_prefix(1, &timestamp, &sample_transactions(size), &BlockHash::ZERO);

        group.throughput(Throughput::Bytes(prefix.len() as u64));
        group.bench_with_input(BenchmarkId::new("hash_with_nonce", size), &prefix, |b, p| {
            b.iter(|| black_box(hash_with_nonce(p, black_box(42))))
        });
    }

    group.finish();
}

// ============================================================================
// Mining
// ============================================================================

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("pow-mining");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let transactions = sample_transactions(10);

    for difficulty in [4u32, 8, 12] {
        for threads in [1usize, 4] {
            let miner = PoWMiner::new(&MiningConfig {
                max_attempts: 50_000_000,
                threads,
            });
            group.bench_with_input(
                BenchmarkId::new(format!("threads_{}", threads), difficulty),
                &difficulty,
                |b, &d| {
                    b.iter(|| {
                        black_box(
                            miner
                                .mine(1, &timestamp, &transactions, &BlockHash::ZERO, d)
                                .unwrap(),
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Validation and full runs
// ============================================================================

fn bench_chain_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain-validation");

    for products in [10usize, 100] {
        let outcome = run_simulation(products, Some(4), Some(BatchPolicy::FixedCount(5))).unwrap();
        let blocks = outcome.ledger.snapshot();

        group.throughput(Throughput::Elements(blocks.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("validate_blocks", blocks.len()),
            &blocks,
            |b, blocks| b.iter(|| black_box(validate_blocks(blocks, 4).is_ok())),
        );
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);

    for products in [10usize, 50] {
        group.bench_with_input(
            BenchmarkId::new("run_simulation", products),
            &products,
            |b, &n| b.iter(|| black_box(run_simulation(n, Some(8), None).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_block_hashing,
    bench_mining,
    bench_chain_validation,
    bench_simulation,
);

criterion_main!(benches);
