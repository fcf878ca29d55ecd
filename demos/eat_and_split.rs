//! A night out, settled.
//!
//! Builds a small bill, removes someone who left early, and prints the
//! summary and the share payload.

use bill_split::core::ledger::Ledger;
use bill_split::presentation::BillSummary;
use bill_split::settlement::balance::BalanceCalculator;
use bill_split::settlement::planner::SettlementPlanner;
use bill_split::share::{PaymentInfo, SharePayload, ShareRegistry};
use chrono::Utc;
use rust_decimal_macros::dec;

fn main() {
    println!("━━━ Eat & Split ━━━\n");

    let mut ledger = Ledger::new();
    ledger
        .add_participant("Nok", Some("0812345678".to_string()))
        .unwrap();
    for name in ["Ploy", "Tan", "Mew"] {
        ledger.add_participant(name, None).unwrap();
    }

    ledger
        .add_expense("Mookata", dec!(1196), "Nok", ["Nok", "Ploy", "Tan", "Mew"])
        .unwrap();
    ledger
        .add_expense("Beer tower", dec!(650), "Tan", ["Nok", "Tan", "Mew"])
        .unwrap();
    ledger
        .add_expense("Mango sticky rice", dec!(120), "Ploy", ["Mew"])
        .unwrap();
    ledger
        .add_expense("Taxi home", dec!(245), "Ploy", ["Ploy", "Nok"])
        .unwrap();

    match ledger.add_participant("nok", None) {
        Ok(_) => unreachable!("names are case-insensitive"),
        Err(e) => println!("Rejected: {}\n", e),
    }

    let planner = SettlementPlanner::new();
    println!("{}", BillSummary::new(&ledger, &planner));

    // Mew went home early and settled in cash.
    let removal = ledger.remove_participant(&"Mew".into()).unwrap();
    println!(
        "Removed {}: {} order(s) deleted, {} split(s) shrunk\n",
        removal.participant.name(),
        removal.deleted_expenses.len(),
        removal.shrunk_expenses.len()
    );

    let sheet = BalanceCalculator::compute(&ledger);
    let plan = planner.compute_payments(sheet.balances());
    println!("━━━ Payments after Mew left ━━━\n");
    print!("{}", plan);
    println!("\nMoney conserved: {}\n", sheet.is_balanced());

    let info = PaymentInfo {
        full_name: "Nok S.".to_string(),
        promptpay: "0812345678".to_string(),
        ..PaymentInfo::default()
    };
    let payload = SharePayload::from_ledger(&ledger, Some(info), Utc::now());
    let mut registry = ShareRegistry::new();
    let id = registry.publish(&payload).unwrap();
    println!("━━━ Shared as {} ━━━\n", id);
    println!("{}", serde_json::to_string_pretty(&payload).unwrap());
}
