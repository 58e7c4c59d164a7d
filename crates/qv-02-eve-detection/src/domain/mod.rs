//! # Domain Module
//!
//! Channel model and QBER sampling strategies.

pub mod channel_model;
pub mod value_objects;

pub use channel_model::*;
pub use value_objects::*;
