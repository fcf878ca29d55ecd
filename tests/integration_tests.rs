use bill_split::core::error::{AmountProblem, LedgerError};
use bill_split::core::expense::ExpenseEntry;
use bill_split::core::ledger::Ledger;
use bill_split::core::money::{is_negligible, Money, DEFAULT_TOLERANCE};
use bill_split::core::participant::ParticipantName;
use bill_split::presentation::BillSummary;
use bill_split::settlement::balance::BalanceCalculator;
use bill_split::settlement::planner::SettlementPlanner;
use bill_split::share::{PaymentInfo, SharePayload, ShareRegistry};
use bill_split::store::{BillId, BillSessions, BillStore, MemoryBillStore, StoreError};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

fn ledger_with(names: &[&str]) -> Ledger {
    let mut ledger = Ledger::new();
    for name in names {
        ledger.add_participant(*name, None).unwrap();
    }
    ledger
}

fn owes(ledger: &Ledger, name: &str) -> Money {
    BalanceCalculator::compute(ledger)
        .get(&ParticipantName::new(name))
        .unwrap()
        .owes
}

/// Two people, one lunch paid by Alice.
#[test]
fn lunch_for_two() {
    let mut ledger = ledger_with(&["Alice", "Bob"]);
    ledger
        .add_expense("Lunch", dec!(100), "Alice", ["Alice", "Bob"])
        .unwrap();

    let sheet = BalanceCalculator::compute(&ledger);
    let alice = sheet.get(&"Alice".into()).unwrap();
    let bob = sheet.get(&"Bob".into()).unwrap();
    assert_eq!(alice.paid, dec!(100));
    assert_eq!(alice.owes, dec!(50));
    assert_eq!(alice.balance, dec!(50));
    assert_eq!(bob.paid, Money::ZERO);
    assert_eq!(bob.owes, dec!(50));
    assert_eq!(bob.balance, dec!(-50));

    let plan = SettlementPlanner::new().compute_payments(sheet.balances());
    assert_eq!(plan.len(), 1);
    let payment = &plan.instructions()[0];
    assert_eq!(payment.from.as_str(), "Bob");
    assert_eq!(payment.to.as_str(), "Alice");
    assert_eq!(payment.amount, dec!(50));
}

/// Dinner split three ways plus a taxi split two ways.
#[test]
fn dinner_and_taxi() {
    let mut ledger = ledger_with(&["A", "B", "C"]);
    ledger
        .add_expense("Dinner", dec!(90), "A", ["A", "B", "C"])
        .unwrap();
    ledger.add_expense("Taxi", dec!(30), "B", ["A", "B"]).unwrap();

    let sheet = BalanceCalculator::compute(&ledger);
    assert_eq!(sheet.get(&"A".into()).unwrap().balance, dec!(45));
    assert_eq!(sheet.get(&"B".into()).unwrap().balance, dec!(-15));
    assert_eq!(sheet.get(&"C".into()).unwrap().balance, dec!(-30));

    let plan = SettlementPlanner::new().compute_payments(sheet.balances());
    assert_eq!(plan.total_transferred(), dec!(45));
    assert!(plan.instructions().iter().all(|i| i.to.as_str() == "A"));
    for residual in plan.apply(sheet.balances()) {
        assert!(is_negligible(residual.balance, DEFAULT_TOLERANCE));
    }
}

/// Removing a participant deletes their solo entries and shrinks shared ones.
#[test]
fn removal_cascades() {
    let mut ledger = ledger_with(&["A", "B", "C"]);
    ledger.add_expense("Snack", dec!(25), "A", ["C"]).unwrap();
    ledger
        .add_expense("Pizza", dec!(120), "A", ["A", "B", "C"])
        .unwrap();
    assert_eq!(owes(&ledger, "B"), dec!(40));

    let removal = ledger.remove_participant(&"C".into()).unwrap();
    assert_eq!(removal.deleted_expenses.len(), 1);
    assert_eq!(removal.deleted_expenses[0].description(), "Snack");
    assert_eq!(ledger.expenses().len(), 1);
    assert_eq!(ledger.expenses()[0].split_with().len(), 2);
    assert_eq!(owes(&ledger, "A"), dec!(60));
    assert_eq!(owes(&ledger, "B"), dec!(60));
    assert!(BalanceCalculator::compute(&ledger).is_balanced());
}

/// Names collide regardless of case.
#[test]
fn duplicate_name_rejected() {
    let mut ledger = ledger_with(&["Bob"]);
    assert!(matches!(
        ledger.add_participant("bob", None),
        Err(LedgerError::DuplicateName(_))
    ));
}

/// No expenses: zero balances and nothing to pay.
#[test]
fn empty_bill_is_settled() {
    let ledger = ledger_with(&["A", "B", "C"]);
    let sheet = BalanceCalculator::compute(&ledger);
    assert!(sheet.balances().iter().all(|b| b.balance.is_zero()));

    let plan = SettlementPlanner::new().compute_payments(sheet.balances());
    assert!(plan.is_settled());
    assert_eq!(plan.to_string(), "All payments are settled\n");
}

/// Zero amounts and empty split groups never reach the ledger.
#[test]
fn invalid_amounts_rejected() {
    let mut ledger = ledger_with(&["A", "B"]);
    assert_eq!(
        ledger.add_expense("Free", dec!(0), "A", ["A", "B"]).unwrap_err(),
        LedgerError::InvalidAmount(AmountProblem::NonPositive(dec!(0)))
    );
    assert_eq!(
        ledger
            .add_expense("Nobody", dec!(10), "A", Vec::<&str>::new())
            .unwrap_err(),
        LedgerError::InvalidAmount(AmountProblem::EmptySplit)
    );
    assert!(ledger.expenses().is_empty());
}

/// Editing an entry swaps the whole entry and rebalances.
#[test]
fn replace_expense_rebalances() {
    let mut ledger = ledger_with(&["A", "B"]);
    ledger.add_expense("Lunch", dec!(100), "A", ["A", "B"]).unwrap();

    let edited = ExpenseEntry::new("Lunch", dec!(100), "B", ["A"]).unwrap();
    ledger.replace_expense(0, edited).unwrap();

    let plan = SettlementPlanner::new().plan(&ledger);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.instructions()[0].from.as_str(), "A");
    assert_eq!(plan.instructions()[0].amount, dec!(100));
}

/// Bill → store → session → share link → rebuilt ledger.
#[test]
fn persist_and_share_pipeline() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap();
    let mut ledger = ledger_with(&["Nok", "Ploy", "Tan"]);
    ledger
        .add_expense("Mookata", dec!(897), "Nok", ["Nok", "Ploy", "Tan"])
        .unwrap();
    ledger
        .add_expense("Beer", dec!(240), "Tan", ["Nok", "Tan"])
        .unwrap();

    let mut store = MemoryBillStore::new();
    let mut sessions = BillSessions::new();
    let bill_id = BillId::generate();
    store.save_at(&bill_id, &ledger, now).unwrap();
    sessions.save("line-user-1", bill_id.clone());

    let current = sessions.load("line-user-1").unwrap();
    let loaded = store.load_at(current, now + Duration::days(1)).unwrap();
    assert_eq!(loaded, ledger);

    let info = PaymentInfo {
        promptpay: "0812345678".into(),
        ..PaymentInfo::default()
    };
    let payload = SharePayload::from_ledger(&loaded, Some(info), now);
    let mut registry = ShareRegistry::new();
    let share_id = registry.publish_at(&payload, now).unwrap();

    let fetched = registry.fetch_at(&share_id, now + Duration::hours(2)).unwrap();
    assert_eq!(fetched.total_amount, dec!(1137));
    assert_eq!(fetched.to_ledger().unwrap(), ledger);

    assert!(matches!(
        registry.fetch_at(&share_id, now + Duration::hours(48)),
        Err(StoreError::Expired { .. })
    ));
}

/// Stored snapshots are validated when they come back.
#[test]
fn tampered_snapshot_rejected() {
    let json = r#"{
        "participants": [{"name": "A"}, {"name": "B"}],
        "expenses": [{"description": "x", "amount": "-5", "payer": "A", "split_with": ["B"]}]
    }"#;
    assert!(serde_json::from_str::<Ledger>(json).is_err());
}

/// The trait object works for callers that only know `BillStore`.
#[test]
fn bill_store_trait_object() {
    let mut store: Box<dyn BillStore> = Box::new(MemoryBillStore::new());
    let id = BillId::new("bill-42");
    store.save(&id, &ledger_with(&["A"])).unwrap();
    assert_eq!(store.load(&id).unwrap().participants().len(), 1);
    assert!(matches!(
        store.load(&BillId::new("other")),
        Err(StoreError::NotFound(_))
    ));
}

/// Text summary rounds for display only.
#[test]
fn summary_rounds_for_display() {
    let mut ledger = ledger_with(&["A", "B", "C"]);
    ledger
        .add_expense("Pizza", dec!(1000), "A", ["A", "B", "C"])
        .unwrap();

    let summary = BillSummary::new(&ledger, &SettlementPlanner::new());
    let text = summary.to_string();
    assert!(text.contains("Per person:    333 THB"));
    assert!(text.contains("Total Bill: 1,000 THB"));

    // The underlying balances keep full precision.
    let b = summary.sheet().get(&"B".into()).unwrap();
    assert!(b.owes > dec!(333.33) && b.owes < dec!(333.34));
}
