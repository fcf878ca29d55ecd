use crate::core::money::{Money, MAX_BILL_TOTAL};
use crate::core::participant::ParticipantName;
use thiserror::Error;

/// Structural errors detected by the [`Ledger`](crate::core::ledger::Ledger).
///
/// None of these are fatal: the offending mutation is rejected and the ledger
/// is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("participant name \"{0}\" is already taken")]
    DuplicateName(ParticipantName),
    #[error("participant name must not be empty")]
    EmptyName,
    #[error("no participant named \"{0}\"")]
    UnknownParticipant(ParticipantName),
    #[error("expense references \"{name}\", who is not a participant")]
    InvalidReference { name: ParticipantName },
    #[error("invalid expense: {0}")]
    InvalidAmount(AmountProblem),
    #[error("expense index {index} out of range (ledger has {len} expenses)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Why an expense amount or split was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountProblem {
    #[error("amount must be positive, got {0}")]
    NonPositive(Money),
    #[error("must be split with at least one participant")]
    EmptySplit,
    #[error("amount {0} would take the bill total past {max}", max = MAX_BILL_TOTAL)]
    TooLarge(Money),
}
