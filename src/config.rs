use crate::core::money::{CurrencyCode, Money, DEFAULT_TOLERANCE};
use crate::settlement::planner::SettlementPlanner;
use crate::share::registry::{ShareRegistry, DEFAULT_SHARE_TTL_HOURS};
use crate::store::memory::{MemoryBillStore, DEFAULT_BILL_TTL_DAYS};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors loading a [`BillConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Longest lifetime accepted for stored bills and share links.
pub const MAX_TTL_DAYS: i64 = 3650;

/// Deployment settings. Every field has a default, so a config file only
/// needs the fields it changes.
///
/// ```json
/// { "currency": "THB", "tolerance": "0.000001", "share_ttl_hours": 24, "bill_ttl_days": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillConfig {
    /// Currency amounts are displayed in.
    pub currency: CurrencyCode,
    /// Balances within this distance of zero count as settled.
    pub tolerance: Money,
    /// Lifetime of a share link.
    pub share_ttl_hours: i64,
    /// Lifetime of a stored bill.
    pub bill_ttl_days: i64,
}

impl Default for BillConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            tolerance: DEFAULT_TOLERANCE,
            share_ttl_hours: DEFAULT_SHARE_TTL_HOURS,
            bill_ttl_days: DEFAULT_BILL_TTL_DAYS,
        }
    }
}

impl BillConfig {
    /// Load and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the tolerance is not negative and both lifetimes lie in
    /// `1..=MAX_TTL_DAYS` days.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tolerance.is_sign_negative() {
            return Err(ConfigError::Invalid(format!(
                "tolerance must not be negative, got {}",
                self.tolerance
            )));
        }
        self.share_ttl()?;
        self.bill_ttl()?;
        Ok(())
    }

    pub fn planner(&self) -> SettlementPlanner {
        SettlementPlanner::with_tolerance(self.tolerance)
    }

    pub fn share_registry(&self) -> Result<ShareRegistry, ConfigError> {
        Ok(ShareRegistry::with_ttl(self.share_ttl()?))
    }

    pub fn bill_store(&self) -> Result<MemoryBillStore, ConfigError> {
        Ok(MemoryBillStore::with_ttl(self.bill_ttl()?))
    }

    fn share_ttl(&self) -> Result<Duration, ConfigError> {
        bounded_ttl(
            "share_ttl_hours",
            self.share_ttl_hours,
            MAX_TTL_DAYS * 24,
            Duration::try_hours,
        )
    }

    fn bill_ttl(&self) -> Result<Duration, ConfigError> {
        bounded_ttl(
            "bill_ttl_days",
            self.bill_ttl_days,
            MAX_TTL_DAYS,
            Duration::try_days,
        )
    }
}

fn bounded_ttl(
    field: &str,
    value: i64,
    max: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    if !(1..=max).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{} must be between 1 and {}, got {}",
            field, max, value
        )));
    }
    to_duration(value).ok_or_else(|| ConfigError::Invalid(format!("{} out of range", field)))
}
