//! # In-Process Mirrors
//!
//! [`InMemoryRemoteMirror`] keeps accepted rows and can be told to fail or
//! stall. [`NoopRemoteMirror`] accepts and drops everything; it is what the
//! runtime wires when no backend URL is configured.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{KeyMetadataDto, MirrorError, TransactionDto};
use crate::ports::RemoteMirror;

/// How [`InMemoryRemoteMirror`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorBehavior {
    /// Store the row and succeed.
    #[default]
    Accept,
    /// Fail with a network error.
    Fail,
    /// Sleep, then store the row.
    Stall(Duration),
}

/// Mirror keeping rows in memory.
#[derive(Debug, Default)]
pub struct InMemoryRemoteMirror {
    behavior: Mutex<MirrorBehavior>,
    transactions: Mutex<Vec<TransactionDto>>,
    keys: Mutex<Vec<KeyMetadataDto>>,
    attempts: Mutex<usize>,
}

impl InMemoryRemoteMirror {
    /// Accepting mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror that fails every call.
    pub fn failing() -> Self {
        Self::with_behavior(MirrorBehavior::Fail)
    }

    /// Mirror that waits `delay` before accepting.
    pub fn stalling(delay: Duration) -> Self {
        Self::with_behavior(MirrorBehavior::Stall(delay))
    }

    /// Mirror with an explicit behavior.
    pub fn with_behavior(behavior: MirrorBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            ..Self::default()
        }
    }

    /// Change behavior for subsequent calls.
    pub fn set_behavior(&self, behavior: MirrorBehavior) {
        *self.behavior.lock() = behavior;
    }

    /// Accepted transaction rows.
    pub fn transactions(&self) -> Vec<TransactionDto> {
        self.transactions.lock().clone()
    }

    /// Accepted key rows.
    pub fn key_metadata(&self) -> Vec<KeyMetadataDto> {
        self.keys.lock().clone()
    }

    /// Calls received, accepted or not.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }

    async fn admit(&self) -> Result<(), MirrorError> {
        *self.attempts.lock() += 1;
        let behavior = *self.behavior.lock();
        match behavior {
            MirrorBehavior::Accept => Ok(()),
            MirrorBehavior::Fail => Err(MirrorError::Network("mirror offline".to_string())),
            MirrorBehavior::Stall(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl RemoteMirror for InMemoryRemoteMirror {
    async fn create_transaction(&self, dto: &TransactionDto) -> Result<(), MirrorError> {
        self.admit().await?;
        self.transactions.lock().push(dto.clone());
        Ok(())
    }

    async fn create_key_metadata(&self, dto: &KeyMetadataDto) -> Result<(), MirrorError> {
        self.admit().await?;
        self.keys.lock().push(dto.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Mirror that accepts and discards.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRemoteMirror;

#[async_trait]
impl RemoteMirror for NoopRemoteMirror {
    async fn create_transaction(&self, _dto: &TransactionDto) -> Result<(), MirrorError> {
        Ok(())
    }

    async fn create_key_metadata(&self, _dto: &KeyMetadataDto) -> Result<(), MirrorError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
