//! # Mining Bound Tests

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pc_01_ledger::{Ledger, LedgerConfig, LedgerError, MiningConfig, SteppingTimeSource};
    use shared_types::{ActorId, ProductId, Transaction};
    use std::sync::Arc;

    fn created(id: &str) -> Transaction {
        Transaction::created(
            ProductId::new(id).unwrap(),
            "Supplier_1",
            ActorId::new("Supplier_1").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().naive_utc(),
        )
        .unwrap()
    }

    fn ledger(difficulty: u32, max_attempts: u64, threads: usize) -> Ledger {
        Ledger::with_time_source(
            LedgerConfig {
                difficulty,
                mining: MiningConfig {
                    max_attempts,
                    threads,
                },
                genesis_timestamp: None,
            },
            Arc::new(SteppingTimeSource::fixed(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            )),
        )
    }

    #[test]
    fn test_unreachable_difficulty_within_bound() {
        for threads in [1, 4] {
            let mut ledger = ledger(256 + 8, 2_000, threads);

            let err = ledger.append(vec![created("PRD-0001")]).unwrap_err();

            assert_eq!(
                err,
                LedgerError::MiningTimeout {
                    index: 1,
                    difficulty: 264,
                    attempts: 2_000,
                }
            );
            assert_eq!(ledger.len(), 1);
            assert_eq!(ledger.metrics().get_hash_attempts(), 2_000);
        }
    }

    #[test]
    fn test_parallel_matches_sequential_chain() {
        let mut sequential = ledger(10, 5_000_000, 1);
        let mut parallel = ledger(10, 5_000_000, 4);

        for id in ["PRD-0001", "PRD-0002", "PRD-0003"] {
            sequential.append(vec![created(id)]).unwrap();
            parallel.append(vec![created(id)]).unwrap();
        }

        assert_eq!(sequential.chain(), parallel.chain());
    }

    #[test]
    fn test_auto_thread_count_mines() {
        let mut ledger = ledger(6, 5_000_000, 0);
        ledger.append(vec![created("PRD-0001")]).unwrap();
        assert!(ledger.is_valid());
    }
}
