//! # Application Module
//!
//! Application service wrapping a key source.

pub mod service;

pub use service::KeyGenerationService;
