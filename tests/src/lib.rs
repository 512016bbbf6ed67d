//! # Provenance-Chain Test Suite
//!
//! Unified test crate for behavior that spans crates.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Ledger + tracker + driver together
//! │   ├── end_to_end.rs  # Full runs, bijection, determinism
//! │   ├── lifecycle.rs   # Tracker feeding the ledger by hand
//! │   ├── mining.rs      # Attempt bound, parallel search
//! │   └── tamper.rs      # Exported snapshots under modification
//! └── benches/           # Criterion mining benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::tamper
//! cargo bench -p pc-tests
//! ```

pub mod integration;
