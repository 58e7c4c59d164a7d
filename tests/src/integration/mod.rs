//! # Integration Tests
//!
//! Flows through the container's coordinators with real key generation,
//! detection and storage.

pub mod failures;
pub mod properties;
pub mod scenarios;
pub mod voting;
