use crate::store::StoreError;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Entry {
    json: String,
    expires_at: DateTime<Utc>,
}

/// JSON snapshots keyed by id, each valid until `stored_at + ttl`.
#[derive(Debug, Clone)]
pub(crate) struct TtlMap<K> {
    entries: HashMap<K, Entry>,
    ttl: Duration,
}

impl<K> TtlMap<K>
where
    K: Eq + Hash + Display,
{
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Encode and store `value`, returning its expiry time.
    ///
    /// The lifetime must be positive and `now + ttl` representable.
    pub(crate) fn insert<T: Serialize>(
        &mut self,
        key: K,
        value: &T,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, StoreError> {
        let expires_at = Some(self.ttl)
            .filter(|ttl| *ttl > Duration::zero())
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(StoreError::InvalidTtl {
                ttl: self.ttl,
                stored_at: now,
            })?;
        let json = serde_json::to_string(value)?;
        self.entries.insert(key, Entry { json, expires_at });
        Ok(expires_at)
    }

    /// Decode the value under `key` if it has not expired.
    ///
    /// An entry is still valid at exactly its expiry instant.
    pub(crate) fn get<T: DeserializeOwned>(
        &self,
        key: &K,
        now: DateTime<Utc>,
    ) -> Result<T, StoreError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if entry.expires_at < now {
            return Err(StoreError::Expired {
                id: key.to_string(),
                expired_at: entry.expires_at,
            });
        }
        Ok(serde_json::from_str(&entry.json)?)
    }

    pub(crate) fn remove(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop expired entries, returning how many were dropped.
    pub(crate) fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at >= now);
        before - self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
