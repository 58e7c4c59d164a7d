//! # Domain Module
//!
//! Error taxonomy and key-size rules for key generation.

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
