//! # Quantum-Vault Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs        # Harness wiring real subsystems with test doubles
//! │   └── integration/
//! │       ├── scenarios.rs   # Payment / audit / validation scenarios
//! │       ├── properties.rs  # Pipeline-wide invariants
//! │       ├── failures.rs    # Provider, storage and mirror faults
//! │       └── voting.rs      # Ballots, receipts, tally
//! └── benches/
//!     └── pipeline_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qv-tests
//! cargo test -p qv-tests integration::failures::
//! cargo bench -p qv-tests
//! ```

pub mod fixtures;
pub mod integration;
