//! # Election Rules

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shared_types::Election;

use super::errors::VoteError;

/// Check an election definition before it is stored.
pub fn validate_election(election: &Election) -> Result<(), VoteError> {
    if election.election_id.trim().is_empty() {
        return Err(VoteError::Validation("election id is blank".to_string()));
    }
    if election.options.is_empty() {
        return Err(VoteError::Validation(format!(
            "election {} has no options",
            election.election_id
        )));
    }

    let mut seen = HashSet::new();
    for option in &election.options {
        if option.option_id.trim().is_empty() {
            return Err(VoteError::Validation("option id is blank".to_string()));
        }
        if !seen.insert(option.option_id.as_str()) {
            return Err(VoteError::Validation(format!(
                "duplicate option {}",
                option.option_id
            )));
        }
    }

    if election.opens_at >= election.closes_at {
        return Err(VoteError::Validation(format!(
            "election {} closes before it opens",
            election.election_id
        )));
    }
    Ok(())
}

/// Check that `option_id` may be chosen in `election` at `now`.
pub fn check_ballot(election: &Election, option_id: &str, now: DateTime<Utc>) -> Result<(), VoteError> {
    if !election.is_open_at(now) {
        return Err(VoteError::Validation(format!(
            "election {} is not open",
            election.election_id
        )));
    }
    if !election.has_option(option_id) {
        return Err(VoteError::Validation(format!(
            "option {} is not on the ballot of {}",
            option_id, election.election_id
        )));
    }
    Ok(())
}
