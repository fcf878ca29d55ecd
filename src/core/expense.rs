use crate::core::error::{AmountProblem, LedgerError};
use crate::core::money::Money;
use crate::core::participant::ParticipantName;
use serde::{Deserialize, Serialize};

/// One shared cost ("order") on a bill.
///
/// `payer` paid `amount` up front; the cost is divided equally among the
/// participants in `split_with` (the split group). The payer does not have to
/// be a member of the split group.
///
/// An entry only checks its own shape: a positive amount and a non-empty
/// split group. Whether the names exist is checked by the ledger the entry is
/// added to.
///
/// # Examples
///
/// ```
/// use bill_split::core::expense::ExpenseEntry;
/// use rust_decimal_macros::dec;
///
/// let lunch = ExpenseEntry::new("Lunch", dec!(100), "Alice", ["Alice", "Bob"]).unwrap();
/// assert_eq!(lunch.share(), dec!(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseEntryRepr")]
pub struct ExpenseEntry {
    description: String,
    amount: Money,
    payer: ParticipantName,
    split_with: Vec<ParticipantName>,
}

#[derive(Deserialize)]
struct ExpenseEntryRepr {
    description: String,
    amount: Money,
    payer: ParticipantName,
    split_with: Vec<ParticipantName>,
}

impl TryFrom<ExpenseEntryRepr> for ExpenseEntry {
    type Error = LedgerError;

    fn try_from(repr: ExpenseEntryRepr) -> Result<Self, Self::Error> {
        ExpenseEntry::new(repr.description, repr.amount, repr.payer, repr.split_with)
    }
}

impl ExpenseEntry {
    /// Create an expense entry.
    ///
    /// Names repeated in `split_with` (case-insensitively) count once.
    pub fn new<N>(
        description: impl Into<String>,
        amount: Money,
        payer: impl Into<ParticipantName>,
        split_with: impl IntoIterator<Item = N>,
    ) -> Result<Self, LedgerError>
    where
        N: Into<ParticipantName>,
    {
        if amount <= Money::ZERO {
            return Err(LedgerError::InvalidAmount(AmountProblem::NonPositive(
                amount,
            )));
        }

        let mut members: Vec<ParticipantName> = Vec::new();
        for name in split_with {
            let name = name.into();
            if !members.contains(&name) {
                members.push(name);
            }
        }
        if members.is_empty() {
            return Err(LedgerError::InvalidAmount(AmountProblem::EmptySplit));
        }

        Ok(Self {
            description: description.into(),
            amount,
            payer: payer.into(),
            split_with: members,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payer(&self) -> &ParticipantName {
        &self.payer
    }

    pub fn split_with(&self) -> &[ParticipantName] {
        &self.split_with
    }

    /// Whether `name` is in the split group.
    pub fn is_split_with(&self, name: &ParticipantName) -> bool {
        self.split_with.contains(name)
    }

    /// Amount each member of the split group owes for this entry.
    ///
    /// Exact decimal division, not rounded to currency units.
    pub fn share(&self) -> Money {
        self.amount / Money::from(self.split_with.len())
    }

    /// Drop `name` from the split group. Returns `true` if it was a member.
    ///
    /// May leave the split group empty; the ledger deletes such entries.
    pub(crate) fn remove_from_split(&mut self, name: &ParticipantName) -> bool {
        let before = self.split_with.len();
        self.split_with.retain(|member| member != name);
        self.split_with.len() != before
    }
}
