//! # Domain Module

pub mod errors;
pub mod payload;

pub use errors::*;
pub use payload::*;
