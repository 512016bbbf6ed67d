//! # End-to-End Simulation Tests
//!
//! Full runs through `run_simulation` and `SimulationDriver`, checked
//! against the ledger and the product map together.

#[cfg(test)]
mod tests {
    use pc_01_ledger::validate_blocks;
    use shared_types::ProductStatus;
    use sim_runtime::{run_simulation, BatchPolicy, SimulationConfig, SimulationDriver};

    fn quick_config(num_products: usize) -> SimulationConfig {
        let mut config = SimulationConfig::with_products(num_products);
        config.ledger.difficulty = 4;
        config
    }

    #[test]
    fn test_three_product_run() {
        let outcome = run_simulation(3, Some(4), None).unwrap();

        let chain = outcome.ledger.chain();
        assert_eq!(chain[0].index, 0);
        assert!(chain[0].transactions.is_empty());
        assert!(chain.len() >= 1 + ProductStatus::LIFECYCLE.len());
        assert!(outcome.ledger.is_valid());

        for product in outcome.products.values() {
            assert_eq!(product.status(), ProductStatus::Purchased);
            assert_eq!(product.history().len(), 5);
            assert_eq!(
                product.current_holder(),
                &product.history().latest().updated_by
            );
        }
    }

    #[test]
    fn test_chain_linkage_and_difficulty() {
        let outcome = run_simulation(5, Some(6), Some(BatchPolicy::FixedCount(3))).unwrap();
        let chain = outcome.ledger.chain();

        for i in 1..chain.len() {
            assert_eq!(chain[i].previous_hash, chain[i - 1].hash);
            assert_eq!(chain[i].hash, chain[i].recompute_hash());
            assert!(chain[i].verify(6));
        }
    }

    #[test]
    fn test_bijection_across_policies() {
        for policy in [
            BatchPolicy::Wave,
            BatchPolicy::FixedCount(1),
            BatchPolicy::FixedCount(7),
            BatchPolicy::FixedCount(100),
        ] {
            let mut config = quick_config(6);
            config.batch_policy = policy;
            let outcome = SimulationDriver::new(config).unwrap().run().unwrap();

            let history: usize = outcome
                .products
                .values()
                .map(|p| p.history().len())
                .sum();
            assert_eq!(outcome.ledger.transaction_count(), history, "{}", policy);

            let created = outcome
                .ledger
                .chain()
                .iter()
                .flat_map(|b| &b.transactions)
                .filter(|tx| tx.new_status() == ProductStatus::Created)
                .count();
            assert_eq!(created, outcome.products.len());
        }
    }

    #[test]
    fn test_every_transaction_matches_a_history_entry() {
        let outcome = SimulationDriver::new(quick_config(4)).unwrap().run().unwrap();

        for tx in outcome.ledger.chain().iter().flat_map(|b| &b.transactions) {
            let product = &outcome.products[tx.product_id()];
            let matching = product
                .history()
                .iter()
                .filter(|e| {
                    e.status == tx.new_status() && &e.updated_by == tx.actor() && e.date == tx.at()
                })
                .count();
            assert_eq!(matching, 1, "{:?}", tx);
        }
    }

    #[test]
    fn test_same_seed_reproduces_products() {
        let a = SimulationDriver::new(quick_config(8)).unwrap().run().unwrap();
        let b = SimulationDriver::new(quick_config(8)).unwrap().run().unwrap();

        assert_eq!(a.products, b.products);
    }

    #[test]
    fn test_max_products_run() {
        let outcome = run_simulation(100, Some(2), None).unwrap();

        assert_eq!(outcome.products.len(), 100);
        assert_eq!(outcome.report.transactions_committed, 500);
        assert!(validate_blocks(outcome.ledger.chain(), 2).is_ok());
    }

    #[test]
    fn test_out_of_range_products_rejected() {
        assert!(run_simulation(0, None, None).is_err());
        assert!(run_simulation(101, None, None).is_err());
    }
}
