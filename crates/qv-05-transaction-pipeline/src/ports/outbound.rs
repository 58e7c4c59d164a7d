//! # Outbound Ports
//!
//! The coordinator drives four collaborators, each owned by its subsystem:
//!
//! | Port | Subsystem |
//! |------|-----------|
//! | [`KeyGenerationApi`] | qv-01 |
//! | [`EveDetectionApi`] | qv-02 |
//! | [`VaultRepository`] | qv-03 |
//! | [`RemoteMirror`] | qv-04 |

pub use qv_01_key_generation::KeyGenerationApi;
pub use qv_02_eve_detection::EveDetectionApi;
pub use qv_03_vault_storage::VaultRepository;
pub use qv_04_remote_mirror::RemoteMirror;
