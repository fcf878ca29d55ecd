//! Random bill generation for benchmarks and CLI experiments.

use crate::core::ledger::Ledger;
use crate::core::money::Money;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;

/// Shape of a randomly generated bill.
#[derive(Debug, Clone)]
pub struct RandomBillConfig {
    /// Number of participants.
    pub participant_count: usize,
    /// Number of expense entries.
    pub expense_count: usize,
    /// Largest split group; clamped to the participant count.
    pub max_split: usize,
    /// Minimum expense amount.
    pub min_amount: Money,
    /// Maximum expense amount.
    pub max_amount: Money,
}

impl Default for RandomBillConfig {
    fn default() -> Self {
        Self {
            participant_count: 6,
            expense_count: 12,
            max_split: 6,
            min_amount: Money::from(20),
            max_amount: Money::from(3_000),
        }
    }
}

/// Generate a random ledger: participants `P-000`, `P-001`, ... and
/// expenses with a random payer, a random split group and an amount
/// rounded to two decimal places.
pub fn generate_random_ledger(config: &RandomBillConfig) -> Ledger {
    let mut rng = rand::thread_rng();
    let mut ledger = Ledger::new();

    let names: Vec<String> = (0..config.participant_count)
        .map(|i| format!("P-{:03}", i))
        .collect();
    for name in &names {
        if let Err(err) = ledger.add_participant(name.as_str(), None) {
            debug!("skipping generated participant: {}", err);
        }
    }
    if names.is_empty() {
        return ledger;
    }

    let min_cents = (config.min_amount * Money::from(100))
        .to_i64()
        .unwrap_or(1)
        .max(1);
    let max_cents = (config.max_amount * Money::from(100))
        .to_i64()
        .unwrap_or(100_000);
    let max_cents = max_cents.max(min_cents);
    let max_split = config.max_split.clamp(1, names.len());

    for i in 0..config.expense_count {
        let payer = &names[rng.gen_range(0..names.len())];
        let split_size = rng.gen_range(1..=max_split);
        let split: Vec<&str> = names
            .choose_multiple(&mut rng, split_size)
            .map(|s| s.as_str())
            .collect();
        let amount = Money::new(rng.gen_range(min_cents..=max_cents), 2);

        let description = format!("Order {}", i + 1);
        if let Err(err) = ledger.add_expense(description, amount, payer.as_str(), split) {
            debug!("skipping generated expense: {}", err);
        }
    }

    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::balance::BalanceCalculator;

    #[test]
    fn test_generated_shape() {
        let config = RandomBillConfig {
            participant_count: 4,
            expense_count: 10,
            ..Default::default()
        };
        let ledger = generate_random_ledger(&config);
        assert_eq!(ledger.participants().len(), 4);
        assert_eq!(ledger.expenses().len(), 10);
        assert!(ledger.expenses().iter().all(|e| e.split_with().len() <= 4));
        assert!(BalanceCalculator::compute(&ledger).is_balanced());
    }

    #[test]
    fn test_no_participants() {
        let config = RandomBillConfig {
            participant_count: 0,
            ..Default::default()
        };
        let ledger = generate_random_ledger(&config);
        assert!(ledger.participants().is_empty());
        assert!(ledger.expenses().is_empty());
    }
}
