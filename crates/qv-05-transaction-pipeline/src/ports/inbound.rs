//! # Inbound Ports
//!
//! What a presentation adapter calls.

use async_trait::async_trait;
use shared_types::{KeyMaterial, OperationMode, ProgressSink, TransactionRecord, TransactionRequest};

use crate::domain::PipelineError;

/// Transaction pipeline - inbound port.
#[async_trait]
pub trait TransactionPipelineApi: Send + Sync {
    /// Run `request` to a terminal state, reporting steps to `sink`.
    ///
    /// Returns the committed record, or the error that ended the run.
    async fn process_transaction(
        &self,
        request: TransactionRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<TransactionRecord, PipelineError>;

    /// Record by id.
    async fn transaction(&self, transaction_id: &str)
        -> Result<Option<TransactionRecord>, PipelineError>;

    /// Records of one mode, newest first.
    async fn history_by_mode(
        &self,
        mode: OperationMode,
    ) -> Result<Vec<TransactionRecord>, PipelineError>;

    /// Key committed with a transaction.
    async fn key_for(&self, transaction_id: &str) -> Result<Option<KeyMaterial>, PipelineError>;
}
