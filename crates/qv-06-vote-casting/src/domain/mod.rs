//! # Domain Module

pub mod ballot;
pub mod election;
pub mod errors;
pub mod tally;

pub use ballot::*;
pub use election::*;
pub use errors::*;
pub use tally::*;
