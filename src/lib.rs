//! # bill-split
//!
//! Settlement engine for splitting shared bills.
//!
//! Given the people at the table and the orders they shared (each paid by
//! one person and split equally among some of them), this crate computes
//! each person's balance and a near-minimal list of payments that settles
//! everyone up.
//!
//! ## Architecture
//!
//! - **core** — Ledger model: participants, expense entries, the ledger
//! - **settlement** — Balance calculation and greedy settlement planning
//! - **share** — Share payloads published behind expiring links
//! - **store** — Bill snapshots and per-user bill sessions
//! - **presentation** — Rounding, formatting and text summaries
//! - **config** — Deployment settings
//! - **simulation** — Random bill generation

pub mod config;
pub mod core;
pub mod presentation;
pub mod settlement;
pub mod share;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::error::{AmountProblem, LedgerError};
    pub use crate::core::expense::ExpenseEntry;
    pub use crate::core::ledger::{Ledger, ParticipantRemoval};
    pub use crate::core::money::{CurrencyCode, Money, MAX_BILL_TOTAL};
    pub use crate::core::participant::{Participant, ParticipantName};
    pub use crate::settlement::balance::{Balance, BalanceCalculator, BalanceSheet};
    pub use crate::settlement::planner::{SettlementInstruction, SettlementPlan, SettlementPlanner};
}
