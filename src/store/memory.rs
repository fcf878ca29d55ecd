use crate::core::ledger::Ledger;
use crate::store::ttl::TtlMap;
use crate::store::{BillId, BillStore, StoreError};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

/// Default lifetime of a stored bill.
pub const DEFAULT_BILL_TTL_DAYS: i64 = 30;

/// In-memory [`BillStore`] whose snapshots expire after a fixed lifetime.
///
/// Ledgers are kept as JSON, so loading exercises the same validation as a
/// snapshot coming from a real database. A ledger that fails
/// [`Ledger::validate`] (for example one with an entry paid by a removed
/// participant) is refused on save.
///
/// # Examples
///
/// ```
/// use bill_split::core::ledger::Ledger;
/// use bill_split::store::{BillId, BillStore, MemoryBillStore};
///
/// let mut store = MemoryBillStore::new();
/// let id = BillId::generate();
/// store.save(&id, &Ledger::new()).unwrap();
/// assert_eq!(store.load(&id).unwrap(), Ledger::new());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBillStore {
    bills: TtlMap<BillId>,
}

impl Default for MemoryBillStore {
    fn default() -> Self {
        Self::with_ttl(Duration::days(DEFAULT_BILL_TTL_DAYS))
    }
}

impl MemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            bills: TtlMap::new(ttl),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.bills.ttl()
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.len() == 0
    }

    /// [`BillStore::save`] with an explicit clock.
    pub fn save_at(
        &mut self,
        id: &BillId,
        ledger: &Ledger,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, StoreError> {
        ledger.validate()?;
        let expires_at = self.bills.insert(id.clone(), ledger, now)?;
        info!("saved bill {} until {}", id, expires_at);
        Ok(expires_at)
    }

    /// [`BillStore::load`] with an explicit clock.
    pub fn load_at(&self, id: &BillId, now: DateTime<Utc>) -> Result<Ledger, StoreError> {
        self.bills.get(id, now).inspect_err(|err| {
            if let StoreError::Expired { .. } = err {
                warn!("bill {} requested after expiry", id);
            }
        })
    }

    pub fn delete(&mut self, id: &BillId) -> bool {
        self.bills.remove(id)
    }

    /// Drop every expired bill, returning how many were dropped.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        self.bills.purge_expired(now)
    }
}

impl BillStore for MemoryBillStore {
    fn load(&self, id: &BillId) -> Result<Ledger, StoreError> {
        self.load_at(id, Utc::now())
    }

    fn save(&mut self, id: &BillId, ledger: &Ledger) -> Result<(), StoreError> {
        self.save_at(id, ledger, Utc::now()).map(|_| ())
    }
}
