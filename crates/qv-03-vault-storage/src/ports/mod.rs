//! # Ports Module
//!
//! Hexagonal architecture ports (inbound repository, outbound key-value store).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
