use crate::share::payload::SharePayload;
use crate::store::ttl::TtlMap;
use crate::store::StoreError;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default lifetime of a share link.
pub const DEFAULT_SHARE_TTL_HOURS: i64 = 24;

/// Identifier handed out for a published bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareId(Uuid);

impl ShareId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShareId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Published share payloads, each readable until its link expires.
#[derive(Debug, Clone)]
pub struct ShareRegistry {
    shares: TtlMap<ShareId>,
}

impl Default for ShareRegistry {
    fn default() -> Self {
        Self::with_ttl(Duration::hours(DEFAULT_SHARE_TTL_HOURS))
    }
}

impl ShareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            shares: TtlMap::new(ttl),
        }
    }

    /// Publish `payload` under a fresh id.
    pub fn publish(&mut self, payload: &SharePayload) -> Result<ShareId, StoreError> {
        self.publish_at(payload, Utc::now())
    }

    pub fn publish_at(
        &mut self,
        payload: &SharePayload,
        now: DateTime<Utc>,
    ) -> Result<ShareId, StoreError> {
        let id = ShareId::new_v4();
        let expires_at = self.shares.insert(id, payload, now)?;
        info!(
            "published share {} ({} orders) until {}",
            id,
            payload.orders.len(),
            expires_at
        );
        Ok(id)
    }

    /// Fetch a published payload; fails once the link has expired.
    pub fn fetch(&self, id: &ShareId) -> Result<SharePayload, StoreError> {
        self.fetch_at(id, Utc::now())
    }

    pub fn fetch_at(&self, id: &ShareId, now: DateTime<Utc>) -> Result<SharePayload, StoreError> {
        self.shares.get(id, now).inspect_err(|err| {
            if let StoreError::Expired { .. } = err {
                warn!("share {} requested after expiry", id);
            }
        })
    }

    /// Take a share down before it expires.
    pub fn revoke(&mut self, id: &ShareId) -> bool {
        self.shares.remove(id)
    }

    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        self.shares.purge_expired(now)
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.len() == 0
    }
}
