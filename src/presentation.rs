//! Human-readable rendering of balances and settlement plans.
//!
//! This is the only place amounts are rounded. Rounding is half-up to whole
//! currency units, so `2.5` shows as `3` and `-2.5` as `-2`.

use crate::core::expense::ExpenseEntry;
use crate::core::ledger::Ledger;
use crate::core::money::{CurrencyCode, Money};
use crate::settlement::balance::{BalanceCalculator, BalanceSheet};
use crate::settlement::planner::{SettlementPlan, SettlementPlanner};
use crate::share::payload::PaymentInfo;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to a whole currency unit, halves towards positive infinity.
pub fn round_half_up(amount: Money) -> Money {
    (amount + dec!(0.5)).floor()
}

/// Format `amount` as a whole number with thousands separators.
///
/// ```
/// use bill_split::presentation::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(1234567.5)), "1,234,568");
/// assert_eq!(format_amount(dec!(-1500)), "-1,500");
/// ```
pub fn format_amount(amount: Money) -> String {
    let rounded = round_half_up(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < Money::ZERO {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `format_amount` followed by the currency code.
pub fn format_money(amount: Money, currency: &CurrencyCode) -> String {
    format!("{} {}", format_amount(amount), currency)
}

/// Share of an entry each member of its split group pays, rounded for display.
pub fn per_person_share(entry: &ExpenseEntry) -> String {
    format_amount(entry.share())
}

/// Which way money flows for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    ToReceive,
    ToPay,
}

impl BalanceStatus {
    /// Zero counts as "to receive".
    pub fn of(balance: Money) -> Self {
        if balance >= Money::ZERO {
            BalanceStatus::ToReceive
        } else {
            BalanceStatus::ToPay
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceStatus::ToReceive => write!(f, "to receive"),
            BalanceStatus::ToPay => write!(f, "to pay"),
        }
    }
}

/// Plain-text summary of a bill: orders, totals per person and payments.
pub struct BillSummary<'a> {
    ledger: &'a Ledger,
    sheet: BalanceSheet,
    plan: SettlementPlan,
    currency: CurrencyCode,
    payment_info: Option<&'a PaymentInfo>,
}

impl<'a> BillSummary<'a> {
    pub fn new(ledger: &'a Ledger, planner: &SettlementPlanner) -> Self {
        let sheet = BalanceCalculator::compute(ledger);
        let plan = planner.compute_payments(sheet.balances());
        Self {
            ledger,
            sheet,
            plan,
            currency: CurrencyCode::default(),
            payment_info: None,
        }
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_payment_info(mut self, info: &'a PaymentInfo) -> Self {
        self.payment_info = Some(info).filter(|info| !info.is_empty());
        self
    }

    pub fn sheet(&self) -> &BalanceSheet {
        &self.sheet
    }

    pub fn plan(&self) -> &SettlementPlan {
        &self.plan
    }
}

impl fmt::Display for BillSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cur = &self.currency;
        writeln!(f, "=== Bill Summary ===")?;

        if let Some(info) = self.payment_info {
            writeln!(f, "\n--- Payment Information ---")?;
            for (label, value) in [
                ("Full Name", &info.full_name),
                ("Account Name", &info.account_name),
                ("Bank Name", &info.bank_name),
                ("Promptpay", &info.promptpay),
            ] {
                if !value.trim().is_empty() {
                    writeln!(f, "  {}: {}", label, value)?;
                }
            }
        }

        writeln!(f, "\n--- Orders ---")?;
        for (i, entry) in self.ledger.expenses().iter().enumerate() {
            let split: Vec<&str> = entry.split_with().iter().map(|n| n.as_str()).collect();
            writeln!(f, "{}. {}", i + 1, entry.description())?;
            writeln!(f, "  Amount:        {}", format_money(entry.amount(), cur))?;
            writeln!(f, "  Paid by:       {}", entry.payer())?;
            writeln!(f, "  Split between: {}", split.join(", "))?;
            writeln!(f, "  Per person:    {} {}", per_person_share(entry), cur)?;
        }

        writeln!(f, "\n--- Final Summary ---")?;
        writeln!(f, "Total Bill: {}", format_money(self.ledger.total_amount(), cur))?;
        for b in self.sheet.balances() {
            writeln!(f, "{}", b.participant)?;
            writeln!(
                f,
                "  Paid: {}  Owes: {}",
                format_money(b.paid, cur),
                format_money(b.owes, cur)
            )?;
            writeln!(
                f,
                "  Balance: {} ({})",
                format_money(b.balance, cur),
                BalanceStatus::of(b.balance)
            )?;
        }

        writeln!(f, "\n--- Payments ---")?;
        if self.plan.is_settled() {
            writeln!(f, "All payments are settled")?;
        }
        for instruction in self.plan.instructions() {
            writeln!(
                f,
                "{} → {}: {}",
                instruction.from,
                instruction.to,
                format_money(instruction.amount, cur)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec!(2.5)), dec!(3));
        assert_eq!(round_half_up(dec!(2.49)), dec!(2));
        assert_eq!(round_half_up(dec!(-2.5)), dec!(-2));
        assert_eq!(round_half_up(dec!(-2.51)), dec!(-3));
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(dec!(0)), "0");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1,000");
        assert_eq!(format_amount(dec!(33.333333)), "33");
        assert_eq!(format_amount(dec!(-0.4)), "0");
        assert_eq!(format_amount(dec!(-1234.6)), "-1,235");
    }

    #[test]
    fn test_balance_status() {
        assert_eq!(BalanceStatus::of(dec!(10)), BalanceStatus::ToReceive);
        assert_eq!(BalanceStatus::of(Money::ZERO), BalanceStatus::ToReceive);
        assert_eq!(BalanceStatus::of(dec!(-0.01)).to_string(), "to pay");
    }

    #[test]
    fn test_per_person_share() {
        let entry = ExpenseEntry::new("Pizza", dec!(100), "A", ["A", "B", "C"]).unwrap();
        assert_eq!(per_person_share(&entry), "33");
    }

    #[test]
    fn test_summary_text() {
        let mut ledger = Ledger::new();
        ledger.add_participant("Alice", None).unwrap();
        ledger.add_participant("Bob", None).unwrap();
        ledger
            .add_expense("Lunch", dec!(1500), "Alice", ["Alice", "Bob"])
            .unwrap();
        let info = PaymentInfo {
            promptpay: "0812345678".into(),
            ..PaymentInfo::default()
        };

        let text = BillSummary::new(&ledger, &SettlementPlanner::new())
            .with_payment_info(&info)
            .to_string();
        assert!(text.contains("Promptpay: 0812345678"));
        assert!(text.contains("Total Bill: 1,500 THB"));
        assert!(text.contains("Balance: 750 THB (to receive)"));
        assert!(text.contains("Balance: -750 THB (to pay)"));
        assert!(text.contains("Bob → Alice: 750 THB"));
    }

    #[test]
    fn test_summary_settled() {
        let mut ledger = Ledger::new();
        ledger.add_participant("Solo", None).unwrap();
        let summary = BillSummary::new(&ledger, &SettlementPlanner::new())
            .with_currency(CurrencyCode::new("USD"));
        assert!(summary.plan().is_settled());
        assert!(summary.to_string().contains("All payments are settled"));
    }
}
