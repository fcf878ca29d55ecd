//! Ledger model: participants, expense entries and the bill they form.

pub mod error;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod participant;
