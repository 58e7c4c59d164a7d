//! # Adapters
//!
//! Concrete key sources.

pub mod http_provider;
pub mod simulated;

#[cfg(test)]
pub(crate) mod test_server;

pub use http_provider::{HttpProviderConfig, HttpQkdProvider};
pub use simulated::SimulatedKeySource;
