//! # Vault Configuration
//!
//! Unified configuration for all subsystems, read from `QV_*` variables.
//!
//! | Variable | Default | Effect |
//! |----------|---------|--------|
//! | `QV_DATA_DIR` | `./data` | Store directory; `:memory:` keeps nothing on disk |
//! | `QV_QKD_PROVIDER_URL` | unset | External QKD provider; unset uses the simulation |
//! | `QV_QKD_PROVIDER` | `PROVIDER_A` | Provider tag for issued keys |
//! | `QV_PROVIDER_TIMEOUT_MS` | `10000` | Key request deadline |
//! | `QV_KEY_SIZE_BITS` | `256` | Key size for payments and ballots |
//! | `QV_MIRROR_URL` | unset | Remote backend; unset disables mirroring |
//! | `QV_SYNC_TIMEOUT_MS` | `3000` | Mirror call deadline |
//! | `QV_DETECTION_SEED` | unset | Seed for the synthetic channel model |

use std::path::PathBuf;
use std::str::FromStr;

use quantum_telemetry::TelemetryConfig;
use qv_01_key_generation::KeyGenConfig;
use qv_02_eve_detection::DetectionConfig;
use qv_03_vault_storage::StorageConfig;
use qv_04_remote_mirror::MirrorConfig;
use qv_05_transaction_pipeline::PipelineConfig;
use qv_06_vote_casting::VoteConfig;
use shared_types::KeyProvider;
use thiserror::Error;

/// In-memory marker for `QV_DATA_DIR`.
pub const IN_MEMORY_DATA_DIR: &str = ":memory:";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Where keys come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeySourceConfig {
    /// Local BB84 simulation.
    #[default]
    Simulation,
    /// External provider over HTTP.
    Http {
        /// Provider base URL
        base_url: String,
        /// Tag stamped on issued keys
        provider: KeyProvider,
    },
}

/// Complete vault configuration.
#[derive(Debug, Clone, Default)]
pub struct VaultConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Key source selection.
    pub key_source: KeySourceConfig,
    /// Key generation configuration.
    pub key_gen: KeyGenConfig,
    /// Detection configuration.
    pub detection: DetectionConfig,
    /// Remote mirror configuration.
    pub mirror: MirrorConfig,
    /// Transaction pipeline configuration.
    pub pipeline: PipelineConfig,
    /// Vote casting configuration.
    pub vote: VoteConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl VaultConfig {
    /// Fully in-memory configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            storage: StorageConfig::for_testing(),
            key_source: KeySourceConfig::Simulation,
            key_gen: KeyGenConfig::for_testing(),
            detection: DetectionConfig::for_testing(),
            mirror: MirrorConfig::for_testing(),
            pipeline: PipelineConfig::for_testing(),
            vote: VoteConfig::for_testing(),
            telemetry: TelemetryConfig::for_testing(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|var| std::env::var(var).ok())?;
        config.telemetry = TelemetryConfig::from_env();
        Ok(config)
    }

    /// Load configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("QV_DATA_DIR") {
            config.storage.data_dir = if dir == IN_MEMORY_DATA_DIR {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }

        if let Some(base_url) = lookup("QV_QKD_PROVIDER_URL") {
            let provider = match lookup("QV_QKD_PROVIDER") {
                Some(tag) => parse_provider(&tag)?,
                None => KeyProvider::ProviderA,
            };
            config.key_source = KeySourceConfig::Http { base_url, provider };
        }

        if let Some(ms) = parse_var(&lookup, "QV_PROVIDER_TIMEOUT_MS")? {
            config.key_gen.provider_timeout_ms = ms;
        }
        if let Some(bits) = parse_var::<u32, _>(&lookup, "QV_KEY_SIZE_BITS")? {
            config.pipeline.key_size_bits = bits;
            config.vote.key_size_bits = bits;
        }

        config.mirror.base_url = lookup("QV_MIRROR_URL");
        if let Some(ms) = parse_var(&lookup, "QV_SYNC_TIMEOUT_MS")? {
            config.pipeline.sync_timeout_ms = ms;
        }

        config.detection.seed = parse_var(&lookup, "QV_DETECTION_SEED")?;

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_provider(tag: &str) -> Result<KeyProvider, ConfigError> {
    match tag.trim().to_ascii_uppercase().as_str() {
        "PROVIDER_A" => Ok(KeyProvider::ProviderA),
        "PROVIDER_B" => Ok(KeyProvider::ProviderB),
        _ => Err(ConfigError::Invalid {
            var: "QV_QKD_PROVIDER",
            value: tag.to_string(),
            reason: "expected PROVIDER_A or PROVIDER_B".to_string(),
        }),
    }
}
