//! # Domain Module
//!
//! Errors, key layout and maintenance reports for the vault store.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
