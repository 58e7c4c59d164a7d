//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{Election, ProgressSink, VoteReceipt};

use crate::domain::{ElectionTally, VoteError};

/// Vote casting - inbound port.
#[async_trait]
pub trait VoteCastingApi: Send + Sync {
    /// Cast a ballot; `simulate_eve` forces an eavesdropper on the exchange.
    async fn cast_vote(
        &self,
        election_id: &str,
        option_id: &str,
        simulate_eve: bool,
    ) -> Result<VoteReceipt, VoteError>;

    /// Same as [`cast_vote`](Self::cast_vote), reporting steps to `sink`.
    async fn cast_vote_observed(
        &self,
        election_id: &str,
        option_id: &str,
        simulate_eve: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<VoteReceipt, VoteError>;

    /// Create an election, or replace one that has no ballots yet.
    async fn register_election(&self, election: Election) -> Result<(), VoteError>;

    /// All elections, ordered by id.
    async fn elections(&self) -> Result<Vec<Election>, VoteError>;

    /// Receipt for `token`, if a ballot was committed under it.
    async fn verify_receipt(&self, token: &str) -> Result<Option<VoteReceipt>, VoteError>;

    /// Open and count every ballot of an election.
    async fn tally(&self, election_id: &str) -> Result<ElectionTally, VoteError>;
}
