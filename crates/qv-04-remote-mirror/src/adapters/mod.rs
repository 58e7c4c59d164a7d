//! # Adapters
//!
//! Concrete remote mirrors.

pub mod http;
pub mod memory;

#[cfg(test)]
pub(crate) mod test_server;

pub use http::HttpRemoteMirror;
pub use memory::{InMemoryRemoteMirror, MirrorBehavior, NoopRemoteMirror};
