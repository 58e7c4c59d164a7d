//! # Election Tally

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::Election;

/// Counted ballots of one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionTally {
    /// Election counted.
    pub election_id: String,
    /// Valid ballots per option; every option is present.
    pub counts: BTreeMap<String, u64>,
    /// Ballots that could not be opened or did not match the election.
    pub rejected: u64,
}

impl ElectionTally {
    /// Empty tally with a zero entry per option.
    pub fn empty(election: &Election) -> Self {
        Self {
            election_id: election.election_id.clone(),
            counts: election
                .options
                .iter()
                .map(|o| (o.option_id.clone(), 0))
                .collect(),
            rejected: 0,
        }
    }

    /// Count one valid ballot. Returns false for an unknown option.
    pub fn count(&mut self, option_id: &str) -> bool {
        match self.counts.get_mut(option_id) {
            Some(n) => {
                *n += 1;
                true
            }
            None => false,
        }
    }

    /// Valid ballots counted.
    pub fn valid(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Valid plus rejected ballots.
    pub fn total(&self) -> u64 {
        self.valid() + self.rejected
    }

    /// Option with the most votes; `None` when empty or tied.
    pub fn leader(&self) -> Option<&str> {
        let max = *self.counts.values().max()?;
        if max == 0 {
            return None;
        }
        let mut leaders = self.counts.iter().filter(|(_, &n)| n == max);
        let (first, _) = leaders.next()?;
        match leaders.next() {
            Some(_) => None,
            None => Some(first.as_str()),
        }
    }
}
