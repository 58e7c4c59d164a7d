//! # QV-06 Vote Casting
//!
//! Casts a ballot only over a channel no one listened to.
//!
//! **Subsystem ID:** 6  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//! validate election/option            (no step, nothing stored on failure)
//! INIT → KEY_GEN → EVE_CHECK ─┬─→ ABORT             (nothing stored)
//!                             └─→ ENCRYPT → PERSIST_RECORD → PERSIST_KEY → DONE
//! ```
//!
//! The chosen option only exists inside the sealed ballot. A receipt token
//! (`#QV-` + 8 uppercase hex digits) lets the voter check the ballot was
//! counted; [`VoteCoordinator::tally`] opens every ballot with its stored key.
//!
//! ## Module Structure
//!
//! ```text
//! qv-06-vote-casting/
//! ├── domain/          # VoteError, ballot sealing, election rules, tally
//! ├── ports/           # VoteCastingApi (inbound)
//! ├── service.rs       # VoteCoordinator
//! └── config.rs        # VoteConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::VoteConfig;
pub use domain::{
    generate_receipt_token, open_ballot, seal_ballot, validate_election, Ballot, ElectionTally,
    VoteError,
};
pub use ports::VoteCastingApi;
pub use service::VoteCoordinator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
