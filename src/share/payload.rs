use crate::core::error::LedgerError;
use crate::core::expense::ExpenseEntry;
use crate::core::ledger::Ledger;
use crate::core::money::Money;
use crate::core::participant::ParticipantName;
use crate::settlement::balance::BalanceCalculator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order as it appears on a shared bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedOrder {
    pub name: String,
    pub value: Money,
    pub selected_people: Vec<ParticipantName>,
    pub payer: ParticipantName,
}

/// A participant's totals as they appear on a shared bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedPerson {
    pub name: ParticipantName,
    pub paid: Money,
    pub owes: Money,
    pub balance: Money,
}

/// Where to send money. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInfo {
    pub account_name: String,
    pub promptpay: String,
    pub full_name: String,
    pub bank_name: String,
}

impl PaymentInfo {
    pub fn is_empty(&self) -> bool {
        [
            &self.account_name,
            &self.promptpay,
            &self.full_name,
            &self.bank_name,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// A bill published behind a share link: its orders, everyone's totals,
/// how to pay, and when it was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub orders: Vec<SharedOrder>,
    pub people: Vec<SharedPerson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
    pub total_amount: Money,
    pub timestamp: DateTime<Utc>,
}

impl SharePayload {
    /// Snapshot `ledger` and its balances.
    ///
    /// Payment info with no filled-in field is dropped.
    pub fn from_ledger(
        ledger: &Ledger,
        payment_info: Option<PaymentInfo>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let orders = ledger
            .expenses()
            .iter()
            .map(|entry| SharedOrder {
                name: entry.description().to_string(),
                value: entry.amount(),
                selected_people: entry.split_with().to_vec(),
                payer: entry.payer().clone(),
            })
            .collect();

        let people = BalanceCalculator::compute(ledger)
            .into_balances()
            .into_iter()
            .map(|b| SharedPerson {
                name: b.participant,
                paid: b.paid,
                owes: b.owes,
                balance: b.balance,
            })
            .collect();

        Self {
            orders,
            people,
            payment_info: payment_info.filter(|info| !info.is_empty()),
            total_amount: ledger.total_amount(),
            timestamp,
        }
    }

    /// Rebuild the ledger the payload was made from.
    ///
    /// People become participants in order and orders become expense
    /// entries, each checked as if added by hand. The stored totals are not
    /// trusted; recompute them from the returned ledger.
    pub fn to_ledger(&self) -> Result<Ledger, LedgerError> {
        let mut ledger = Ledger::new();
        for person in &self.people {
            ledger.add_participant(person.name.clone(), None)?;
        }
        for order in &self.orders {
            let entry = ExpenseEntry::new(
                order.name.clone(),
                order.value,
                order.payer.clone(),
                order.selected_people.iter().cloned(),
            )?;
            ledger.push_expense(entry)?;
        }
        Ok(ledger)
    }
}
