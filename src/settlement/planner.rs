use crate::core::ledger::Ledger;
use crate::core::money::{is_negligible, Money, DEFAULT_TOLERANCE};
use crate::core::participant::ParticipantName;
use crate::settlement::balance::{Balance, BalanceCalculator};
use log::debug;
use serde::{Deserialize, Serialize};

/// One directed payment that helps zero out the balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInstruction {
    /// The debtor who pays.
    pub from: ParticipantName,
    /// The creditor who receives.
    pub to: ParticipantName,
    /// Always positive.
    pub amount: Money,
}

/// The ordered list of payments that settles a bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    instructions: Vec<SettlementInstruction>,
}

impl SettlementPlan {
    pub fn instructions(&self) -> &[SettlementInstruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// No payments are needed.
    pub fn is_settled(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Total money moved by the plan.
    pub fn total_transferred(&self) -> Money {
        self.instructions.iter().map(|i| i.amount).sum()
    }

    /// Balances left over after every instruction has been paid.
    ///
    /// Paying moves the payer's balance up towards zero and the receiver's
    /// balance down towards zero. For a plan computed from `balances`, every
    /// residual is zero within tolerance.
    pub fn apply(&self, balances: &[Balance]) -> Vec<Balance> {
        let mut residual = balances.to_vec();
        for instruction in &self.instructions {
            for balance in residual.iter_mut() {
                if balance.participant == instruction.from {
                    balance.balance += instruction.amount;
                } else if balance.participant == instruction.to {
                    balance.balance -= instruction.amount;
                }
            }
        }
        residual
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_settled() {
            return writeln!(f, "All payments are settled");
        }
        for instruction in &self.instructions {
            writeln!(
                f,
                "{} → {}: {}",
                instruction.from,
                instruction.to,
                instruction.amount.normalize()
            )?;
        }
        Ok(())
    }
}

/// Turns balances into settling payments.
///
/// Uses greedy sorted matching: the largest debtor pays the largest
/// creditors first. The result has at most `debtors + creditors - 1`
/// instructions. It is near-minimal, not the provably minimal number of
/// transactions (that problem is NP-hard).
#[derive(Debug, Clone, Copy)]
pub struct SettlementPlanner {
    tolerance: Money,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SettlementPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat balances and transfers within `tolerance` of zero as zero.
    pub fn with_tolerance(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> Money {
        self.tolerance
    }

    /// Compute balances for `ledger` and plan their settlement.
    pub fn plan(&self, ledger: &Ledger) -> SettlementPlan {
        let sheet = BalanceCalculator::compute(ledger);
        self.compute_payments(sheet.balances())
    }

    /// Compute the payments that drive every balance to zero.
    ///
    /// # Algorithm
    ///
    /// 1. Split participants into debtors (negative) and creditors
    ///    (positive); near-zero balances take no part.
    /// 2. Sort debtors most negative first and creditors most positive
    ///    first. Sorting is stable, so ties keep roster order.
    /// 3. Each debtor pays creditors in order, `min(remaining debt,
    ///    creditor's remaining credit)` at a time, until the debt is gone.
    ///
    /// Creditors' remaining credit carries over from one debtor to the next.
    pub fn compute_payments(&self, balances: &[Balance]) -> SettlementPlan {
        let mut debtors: Vec<(&ParticipantName, Money)> = Vec::new();
        let mut creditors: Vec<(&ParticipantName, Money)> = Vec::new();
        for b in balances {
            if is_negligible(b.balance, self.tolerance) {
                continue;
            }
            if b.balance < Money::ZERO {
                debtors.push((&b.participant, b.balance));
            } else {
                creditors.push((&b.participant, b.balance));
            }
        }

        debtors.sort_by(|a, b| a.1.cmp(&b.1));
        creditors.sort_by(|a, b| b.1.cmp(&a.1));

        let mut instructions = Vec::new();
        for (debtor, balance) in debtors {
            let mut remaining = balance.abs();
            for (creditor, credit) in creditors.iter_mut() {
                if is_negligible(remaining, self.tolerance) {
                    break;
                }
                if is_negligible(*credit, self.tolerance) {
                    continue;
                }
                let transfer = remaining.min(*credit);
                remaining -= transfer;
                *credit -= transfer;
                if transfer > self.tolerance {
                    instructions.push(SettlementInstruction {
                        from: debtor.clone(),
                        to: (*creditor).clone(),
                        amount: transfer,
                    });
                }
            }
        }

        debug!(
            "planned {} settlement instructions for {} balances",
            instructions.len(),
            balances.len()
        );
        SettlementPlan { instructions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balances(entries: &[(&str, Money)]) -> Vec<Balance> {
        entries
            .iter()
            .map(|(name, balance)| Balance {
                participant: ParticipantName::new(*name),
                paid: Money::ZERO,
                owes: Money::ZERO,
                balance: *balance,
            })
            .collect()
    }

    fn assert_settles(input: &[Balance], plan: &SettlementPlan) {
        for residual in plan.apply(input) {
            assert!(
                is_negligible(residual.balance, DEFAULT_TOLERANCE),
                "{} left with {}",
                residual.participant,
                residual.balance
            );
        }
    }

    #[test]
    fn test_single_transfer() {
        let input = balances(&[("Alice", dec!(50)), ("Bob", dec!(-50))]);
        let plan = SettlementPlanner::new().compute_payments(&input);
        assert_eq!(
            plan.instructions(),
            &[SettlementInstruction {
                from: "Bob".into(),
                to: "Alice".into(),
                amount: dec!(50),
            }]
        );
        assert_settles(&input, &plan);
    }

    #[test]
    fn test_two_debtors_one_creditor() {
        let input = balances(&[("A", dec!(45)), ("B", dec!(-15)), ("C", dec!(-30))]);
        let plan = SettlementPlanner::new().compute_payments(&input);

        // C owes more, so C pays first.
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.instructions()[0].from.as_str(), "C");
        assert_eq!(plan.instructions()[0].amount, dec!(30));
        assert_eq!(plan.instructions()[1].from.as_str(), "B");
        assert_eq!(plan.instructions()[1].amount, dec!(15));
        assert_eq!(plan.total_transferred(), dec!(45));
        assert_settles(&input, &plan);
    }

    #[test]
    fn test_debtor_split_across_creditors() {
        let input = balances(&[
            ("A", dec!(70)),
            ("B", dec!(30)),
            ("C", dec!(-60)),
            ("D", dec!(-40)),
        ]);
        let plan = SettlementPlanner::new().compute_payments(&input);

        let moves: Vec<(&str, &str, Money)> = plan
            .instructions()
            .iter()
            .map(|i| (i.from.as_str(), i.to.as_str(), i.amount))
            .collect();
        assert_eq!(
            moves,
            vec![
                ("C", "A", dec!(60)),
                ("D", "A", dec!(10)),
                ("D", "B", dec!(30)),
            ]
        );
        assert!(plan.len() <= 2 + 2 - 1);
        assert_settles(&input, &plan);
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let input = balances(&[
            ("P", dec!(-10)),
            ("Q", dec!(-10)),
            ("R", dec!(20)),
        ]);
        let plan = SettlementPlanner::new().compute_payments(&input);
        assert_eq!(plan.instructions()[0].from.as_str(), "P");
        assert_eq!(plan.instructions()[1].from.as_str(), "Q");
    }

    #[test]
    fn test_all_zero_is_settled() {
        let input = balances(&[("A", Money::ZERO), ("B", Money::ZERO)]);
        let plan = SettlementPlanner::new().compute_payments(&input);
        assert!(plan.is_settled());
        assert_eq!(plan.to_string(), "All payments are settled\n");
    }

    #[test]
    fn test_near_zero_noise_ignored() {
        let input = balances(&[("A", dec!(0.0000001)), ("B", dec!(-0.0000001))]);
        let plan = SettlementPlanner::new().compute_payments(&input);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_one_sided_balances_emit_nothing() {
        let input = balances(&[("A", dec!(-5)), ("B", dec!(-5))]);
        assert!(SettlementPlanner::new().compute_payments(&input).is_empty());
    }

    #[test]
    fn test_thirds_do_not_leave_micro_transfers() {
        let third = dec!(100) / dec!(3);
        let input = balances(&[
            ("A", dec!(100) - third),
            ("B", -third),
            ("C", -third),
        ]);
        let plan = SettlementPlanner::new().compute_payments(&input);
        assert_eq!(plan.len(), 2);
        assert!(plan.instructions().iter().all(|i| i.amount > dec!(1)));
        assert_settles(&input, &plan);
    }

    #[test]
    fn test_custom_tolerance() {
        let input = balances(&[("A", dec!(0.4)), ("B", dec!(-0.4))]);
        assert!(SettlementPlanner::with_tolerance(dec!(0.5))
            .compute_payments(&input)
            .is_settled());
        assert_eq!(SettlementPlanner::new().compute_payments(&input).len(), 1);
    }

    #[test]
    fn test_plan_from_ledger() {
        let mut ledger = Ledger::new();
        ledger.add_participant("Alice", None).unwrap();
        ledger.add_participant("Bob", None).unwrap();
        ledger
            .add_expense("Lunch", dec!(100), "Alice", ["Alice", "Bob"])
            .unwrap();
        let plan = SettlementPlanner::new().plan(&ledger);
        assert_eq!(plan.to_string(), "Bob → Alice: 50\n");
    }
}
