//! # Value Objects
//!
//! Storage key layout.

use shared_types::OperationMode;

/// Key prefixes of the vault layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// `tx/` transaction records
    Transaction,
    /// `mode/` per-mode chronological index
    ModeIndex,
    /// `key/` key material
    Key,
    /// `txkey/` owner to key index
    OwnerKey,
    /// `vote/` ballots
    Vote,
    /// `receipt/` receipt token to ballot index
    Receipt,
    /// `election/` election definitions
    Election,
}

impl KeyPrefix {
    /// Prefix text including the trailing slash.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyPrefix::Transaction => "tx/",
            KeyPrefix::ModeIndex => "mode/",
            KeyPrefix::Key => "key/",
            KeyPrefix::OwnerKey => "txkey/",
            KeyPrefix::Vote => "vote/",
            KeyPrefix::Receipt => "receipt/",
            KeyPrefix::Election => "election/",
        }
    }

    /// Full storage key for `id` under this prefix.
    pub fn key(&self, id: &str) -> Vec<u8> {
        format!("{}{}", self.as_str(), id).into_bytes()
    }

    /// Prefix bytes for scans.
    pub fn scan(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}

/// `mode/{MODE}/{micros}/{transaction_id}`; zero-padded so lexical order is
/// chronological.
pub fn mode_index_key(mode: OperationMode, created_micros: i64, transaction_id: &str) -> Vec<u8> {
    format!(
        "{}{}/{:020}/{}",
        KeyPrefix::ModeIndex.as_str(),
        mode.as_str(),
        created_micros.max(0),
        transaction_id
    )
    .into_bytes()
}

/// Scan prefix for one mode.
pub fn mode_index_prefix(mode: OperationMode) -> Vec<u8> {
    format!("{}{}/", KeyPrefix::ModeIndex.as_str(), mode.as_str()).into_bytes()
}

/// `txkey/{owner_id}/{key_id}`.
pub fn owner_key_index(owner_id: &str, key_id: &str) -> Vec<u8> {
    format!("{}{}/{}", KeyPrefix::OwnerKey.as_str(), owner_id, key_id).into_bytes()
}

/// Scan prefix for the keys of one owner.
pub fn owner_key_prefix(owner_id: &str) -> Vec<u8> {
    format!("{}{}/", KeyPrefix::OwnerKey.as_str(), owner_id).into_bytes()
}
