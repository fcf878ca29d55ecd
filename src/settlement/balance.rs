use crate::core::ledger::Ledger;
use crate::core::money::{is_negligible, Money, DEFAULT_TOLERANCE};
use crate::core::participant::ParticipantName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net position of one participant.
///
/// A positive `balance` means the group owes the participant money
/// (creditor); a negative one means the participant owes the group (debtor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant: ParticipantName,
    /// Total of the entries this participant paid for.
    pub paid: Money,
    /// Total of this participant's shares across all split groups.
    pub owes: Money,
    /// `paid - owes`.
    pub balance: Money,
}

impl Balance {
    pub fn new(participant: ParticipantName, paid: Money, owes: Money) -> Self {
        Self {
            participant,
            paid,
            owes,
            balance: paid - owes,
        }
    }
}

/// Balances of every participant, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    balances: Vec<Balance>,
    /// Amount paid by payers who are no longer participants.
    unattributed: Money,
}

impl BalanceSheet {
    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn into_balances(self) -> Vec<Balance> {
        self.balances
    }

    pub fn get(&self, name: &ParticipantName) -> Option<&Balance> {
        self.balances.iter().find(|b| &b.participant == name)
    }

    pub fn total_paid(&self) -> Money {
        self.balances.iter().map(|b| b.paid).sum()
    }

    pub fn total_owed(&self) -> Money {
        self.balances.iter().map(|b| b.owes).sum()
    }

    /// Sum of all balances. Zero (within tolerance) for a consistent ledger.
    pub fn net(&self) -> Money {
        self.balances.iter().map(|b| b.balance).sum()
    }

    /// Paid amounts that could not be credited because the payer was removed.
    pub fn unattributed(&self) -> Money {
        self.unattributed
    }

    /// Verify that money is conserved: balances sum to zero.
    pub fn is_balanced(&self) -> bool {
        self.is_balanced_within(DEFAULT_TOLERANCE)
    }

    /// [`is_balanced`](Self::is_balanced) with a caller-chosen tolerance.
    pub fn is_balanced_within(&self, tolerance: Money) -> bool {
        is_negligible(self.net(), tolerance)
    }
}

/// Reduces a ledger to one balance per participant.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Compute every participant's paid, owed and net amounts.
    ///
    /// # Algorithm
    ///
    /// 1. `paid(P)` = sum of amounts of entries paid by P.
    /// 2. `owes(P)` = sum of `amount / |split group|` over entries split with P.
    /// 3. `balance(P) = paid(P) - owes(P)`.
    ///
    /// Shares keep full decimal precision. The ledger is not modified.
    pub fn compute(ledger: &Ledger) -> BalanceSheet {
        let index: HashMap<&ParticipantName, usize> = ledger
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name(), i))
            .collect();

        let mut paid = vec![Money::ZERO; index.len()];
        let mut owes = vec![Money::ZERO; index.len()];
        let mut unattributed = Money::ZERO;

        for entry in ledger.expenses() {
            match index.get(entry.payer()) {
                Some(&i) => paid[i] += entry.amount(),
                None => unattributed += entry.amount(),
            }

            let share = entry.share();
            for member in entry.split_with() {
                if let Some(&i) = index.get(member) {
                    owes[i] += share;
                }
            }
        }

        let balances = ledger
            .participants()
            .iter()
            .zip(paid.into_iter().zip(owes))
            .map(|(p, (paid, owes))| Balance::new(p.name().clone(), paid, owes))
            .collect();

        BalanceSheet {
            balances,
            unattributed,
        }
    }
}
