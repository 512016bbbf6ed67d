//! # Tamper Detection Tests
//!
//! Export a run, modify the snapshot the way an attacker or a buggy
//! consumer would, and check the audit catches it.

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pc_01_ledger::{ChainIntegrityError, IntegrityViolation, LedgerError};
    use shared_types::BlockHash;
    use sim_runtime::{SimulationConfig, SimulationDriver, SimulationError, SimulationSnapshot};

    fn exported() -> SimulationSnapshot {
        let mut config = SimulationConfig::with_products(3);
        config.ledger.difficulty = 6;
        let outcome = SimulationDriver::new(config).unwrap().run().unwrap();
        SimulationSnapshot::from_outcome(&outcome)
    }

    fn integrity_index(err: SimulationError) -> (u64, IntegrityViolation) {
        match err {
            SimulationError::Ledger(LedgerError::ChainIntegrity(ChainIntegrityError {
                index,
                violation,
            })) => (index, violation),
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_untouched_export_verifies() {
        let snapshot = exported();
        let ledger = snapshot.verify().unwrap();
        assert_eq!(ledger.len(), snapshot.blockchain.len());
    }

    #[test]
    fn test_reordered_transactions_detected() {
        let mut snapshot = exported();
        snapshot.blockchain[3].transactions.swap(0, 1);

        let (index, violation) = integrity_index(snapshot.verify().unwrap_err());
        assert_eq!(index, 3);
        assert_eq!(violation, IntegrityViolation::HashMismatch);
    }

    #[test]
    fn test_modified_nonce_detected() {
        let mut snapshot = exported();
        snapshot.blockchain[1].nonce = snapshot.blockchain[1].nonce.wrapping_add(1);

        let (index, _) = integrity_index(snapshot.verify().unwrap_err());
        assert_eq!(index, 1);
    }

    #[test]
    fn test_rehashed_block_breaks_link() {
        let mut snapshot = exported();
        snapshot.blockchain[2].transactions.pop();
        snapshot.blockchain[2].hash = snapshot.blockchain[2].recompute_hash();

        let (index, violation) = integrity_index(snapshot.verify().unwrap_err());
        // Either the forged hash misses the difficulty or the next link breaks
        assert!(index == 2 || index == 3);
        if index == 3 {
            assert_eq!(violation, IntegrityViolation::BrokenLink);
        }
    }

    #[test]
    fn test_subsecond_block_time_edit_detected() {
        let mut snapshot = exported();
        snapshot.blockchain[2].timestamp += Duration::milliseconds(999);

        let (index, violation) = integrity_index(snapshot.verify().unwrap_err());
        assert_eq!(index, 2);
        assert_eq!(violation, IntegrityViolation::HashMismatch);
    }

    #[test]
    fn test_fractional_block_time_rejected_on_load() {
        let json = exported().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let stamp = value["blockchain"][2]["timestamp"].as_str().unwrap().to_string();
        value["blockchain"][2]["timestamp"] = stamp.replace('Z', ".999Z").into();

        let edited = serde_json::to_string(&value).unwrap();
        assert!(SimulationSnapshot::from_json(&edited).is_err());
    }

    #[test]
    fn test_replaced_genesis_parent_detected() {
        let mut snapshot = exported();
        snapshot.blockchain[0].previous_hash = BlockHash::from_bytes([9u8; 32]);

        let (index, violation) = integrity_index(snapshot.verify().unwrap_err());
        assert_eq!(index, 0);
        assert!(matches!(violation, IntegrityViolation::InvalidGenesis { .. }));
    }

    #[test]
    fn test_edited_json_history_rejected_on_load() {
        let json = exported().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["products"]["PRD-0002"]["status"] = "Manufactured".into();

        let edited = serde_json::to_string(&value).unwrap();
        assert!(SimulationSnapshot::from_json(&edited).is_err());
    }

    #[test]
    fn test_dropped_history_entry_breaks_bijection() {
        let json = exported().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        // Rewind PRD-0001 one stage so the product itself stays consistent
        let product = &mut value["products"]["PRD-0001"];
        let history = product["history"].as_array_mut().unwrap();
        history.pop();
        let last = history.last().unwrap().clone();
        product["status"] = last["status"].clone();
        product["current_holder"] = last["updated_by"].clone();

        let snapshot = SimulationSnapshot::from_json(&serde_json::to_string(&value).unwrap()).unwrap();
        assert!(matches!(
            snapshot.verify(),
            Err(SimulationError::SnapshotMismatch(_))
        ));
    }

    #[test]
    fn test_reassigned_holder_detected() {
        let json = exported().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let product = &mut value["products"]["PRD-0001"];
        let last = product["history"].as_array().unwrap().len() - 1;
        product["history"][last]["updated_by"] = "Mallory_1".into();
        product["current_holder"] = "Mallory_1".into();

        // The product is self-consistent, only the ledger disagrees
        let snapshot = SimulationSnapshot::from_json(&serde_json::to_string(&value).unwrap()).unwrap();
        assert!(matches!(
            snapshot.verify(),
            Err(SimulationError::SnapshotMismatch(_))
        ));
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        exported().write_to(&path).unwrap();
        let loaded = SimulationSnapshot::read_from(&path).unwrap();

        assert!(loaded.verify().is_ok());
    }
}
