use crate::store::BillId;
use log::debug;
use std::collections::HashMap;

/// Remembers which bill each user was last working on.
///
/// One bill per user: saving again replaces the previous id.
#[derive(Debug, Clone, Default)]
pub struct BillSessions {
    sessions: HashMap<String, BillId>,
}

impl BillSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the user's current bill, returning the previous one.
    pub fn save(&mut self, user_id: impl Into<String>, bill_id: BillId) -> Option<BillId> {
        let user_id = user_id.into();
        debug!("user {} now on bill {}", user_id, bill_id);
        self.sessions.insert(user_id, bill_id)
    }

    pub fn load(&self, user_id: &str) -> Option<&BillId> {
        self.sessions.get(user_id)
    }

    pub fn delete(&mut self, user_id: &str) -> Option<BillId> {
        self.sessions.remove(user_id)
    }
}
