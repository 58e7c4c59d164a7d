//! # Domain Module
//!
//! Wire DTOs and errors of the remote mirror.

pub mod dto;
pub mod errors;

pub use dto::*;
pub use errors::*;
