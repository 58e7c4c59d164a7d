//! # Subsystem Container
//!
//! Configuration and construction of every subsystem, with collaborators
//! injected as trait objects.

pub mod config;
pub mod services;

pub use config::{ConfigError, KeySourceConfig, VaultConfig};
pub use services::{ContainerError, VaultContainer};
