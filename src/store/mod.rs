//! Persistence collaborators: bill snapshots, share links and bill sessions.
//!
//! The settlement core never persists anything itself. These stores keep
//! JSON snapshots in memory with an expiry, and decode them back through the
//! validating `Deserialize` impls of the core types.

pub mod memory;
pub mod session;
pub(crate) mod ttl;

use crate::core::error::LedgerError;
use crate::core::ledger::Ledger;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryBillStore;
pub use session::BillSessions;

/// Opaque identifier of a stored bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(String);

impl BillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BillId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors returned by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("nothing stored under {0}")]
    NotFound(String),
    #[error("{id} expired at {expired_at}")]
    Expired {
        id: String,
        expired_at: DateTime<Utc>,
    },
    #[error("snapshot could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("ledger cannot be stored: {0}")]
    Ledger(#[from] LedgerError),
    #[error("lifetime {ttl} does not give a valid expiry from {stored_at}")]
    InvalidTtl {
        ttl: Duration,
        stored_at: DateTime<Utc>,
    },
}

/// Loads and saves ledger snapshots by bill id.
pub trait BillStore {
    /// Fetch the ledger stored under `id`.
    fn load(&self, id: &BillId) -> Result<Ledger, StoreError>;

    /// Store `ledger` under `id`, replacing any previous snapshot.
    fn save(&mut self, id: &BillId, ledger: &Ledger) -> Result<(), StoreError>;
}
