//! # Outbound Ports
//!
//! The remote backend the coordinators push committed rows to.

use async_trait::async_trait;

use crate::domain::{KeyMetadataDto, MirrorError, TransactionDto};

/// Remote mirror - outbound port.
///
/// One attempt per call; deadlines are the caller's concern.
#[async_trait]
pub trait RemoteMirror: Send + Sync {
    /// Push a transaction row.
    async fn create_transaction(&self, dto: &TransactionDto) -> Result<(), MirrorError>;

    /// Push a key descriptor.
    async fn create_key_metadata(&self, dto: &KeyMetadataDto) -> Result<(), MirrorError>;

    /// Mirror name for logs.
    fn name(&self) -> &'static str;
}
