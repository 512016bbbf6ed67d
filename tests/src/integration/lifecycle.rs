//! # Tracker-to-Ledger Tests
//!
//! Drives the provenance tracker by hand and commits its transactions,
//! without the simulation driver in between.

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use pc_01_ledger::{Ledger, LedgerConfig};
    use pc_02_provenance::{ProvenanceError, ProvenanceTracker};
    use shared_types::{ActorId, ProductId, ProductStatus};

    fn at(hours: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + Duration::hours(hours)
    }

    fn actor(name: &str) -> ActorId {
        ActorId::new(name).unwrap()
    }

    #[test]
    fn test_created_to_purchased_rejected() {
        let mut tracker = ProvenanceTracker::new();
        let id = ProductId::new("PRD-0001").unwrap();
        tracker
            .create(id.clone(), "Supplier_1", actor("Supplier_1"), at(0))
            .unwrap();
        let before = tracker.product(&id).unwrap().clone();

        let err = tracker
            .apply(&id, ProductStatus::Purchased, actor("Customer_1"), at(1))
            .unwrap_err();

        assert!(matches!(
            err,
            ProvenanceError::InvalidTransition {
                current: ProductStatus::Created,
                requested: ProductStatus::Purchased,
                ..
            }
        ));
        let after = tracker.product(&id).unwrap();
        assert_eq!(after.history(), before.history());
        assert_eq!(after.status(), ProductStatus::Created);
    }

    #[test]
    fn test_manual_lifecycle_commits() {
        let mut tracker = ProvenanceTracker::new();
        let mut ledger = Ledger::new(LedgerConfig::with_difficulty(4));
        let id = ProductId::new("PRD-0001").unwrap();

        let created = tracker
            .create(id.clone(), "Supplier_2", actor("Supplier_2"), at(0))
            .unwrap();
        ledger.append(vec![created]).unwrap();

        let holders = ["Manufacturer_1", "Distributor_1", "Retailer_1", "Customer_1"];
        for (i, (status, holder)) in ProductStatus::LIFECYCLE[1..]
            .iter()
            .zip(holders)
            .enumerate()
        {
            let tx = tracker
                .apply(&id, *status, actor(holder), at(i as i64 + 1))
                .unwrap();
            ledger.append(vec![tx]).unwrap();
        }

        assert_eq!(ledger.len(), 6);
        assert_eq!(ledger.transaction_count(), tracker.history_len());
        assert!(ledger.is_valid());
        assert_eq!(tracker.custody_edges().len(), 4);
    }
}
