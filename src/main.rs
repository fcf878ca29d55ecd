//! bill-split CLI
//!
//! Settle a shared bill from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Balances and payments for a bill
//! bill-split settle --input bill.json
//!
//! # Output as JSON
//! bill-split settle --input bill.json --format json
//!
//! # Build a share payload
//! bill-split share --input bill.json --promptpay 0812345678
//!
//! # Generate a random bill for testing
//! bill-split generate --participants 5 --expenses 12
//! ```

use bill_split::config::BillConfig;
use bill_split::core::ledger::Ledger;
use bill_split::presentation::BillSummary;
use bill_split::settlement::balance::{Balance, BalanceCalculator};
use bill_split::settlement::planner::SettlementInstruction;
use bill_split::share::{PaymentInfo, SharePayload};
use bill_split::simulation::random_bill::{generate_random_ledger, RandomBillConfig};
use chrono::Utc;
use log::info;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"bill-split — balances and settling payments for shared bills

USAGE:
    bill-split <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and the payments that settle a bill
    share       Print the share payload for a bill
    generate    Generate a random bill (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON bill file
    --format <FORMAT>   Output format: text (default) or json
    --config <FILE>     Path to JSON config file

OPTIONS (share):
    --input <FILE>           Path to JSON bill file
    --promptpay <ID>         PromptPay id to pay the bill owner on
    --account-name <NAME>    Bank account name
    --full-name <NAME>       Bill owner's full name
    --bank-name <NAME>       Bank name

OPTIONS (generate):
    --participants <N>  Number of participants (default: 6)
    --expenses <N>      Number of expenses (default: 12)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    bill-split settle --input bill.json
    bill-split settle --input bill.json --format json --config bill-split.json
    bill-split share --input bill.json --promptpay 0812345678
    bill-split generate --participants 4 --expenses 8 --output bill.json"#
    );
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettleOutput<'a> {
    currency: String,
    total_amount: String,
    balanced: bool,
    settled: bool,
    balances: &'a [Balance],
    payments: &'a [SettlementInstruction],
}

fn load_ledger(path: &str) -> Ledger {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing bill: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "participants": [{{ "name": "Alice", "promptpay": "0812345678" }}, {{ "name": "Bob" }}],
  "expenses": [
    {{ "description": "Lunch", "amount": "100", "payer": "Alice", "split_with": ["Alice", "Bob"] }}
  ]
}}"#
        );
        process::exit(1);
    })
}

fn next_value(args: &[String], i: usize, flag: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires a value", flag);
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = BillConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input"));
            }
            "--format" => {
                i += 1;
                format = next_value(args, i, "--format");
            }
            "--config" => {
                i += 1;
                let path = next_value(args, i, "--config");
                config = BillConfig::from_file(&path).unwrap_or_else(|e| {
                    eprintln!("Error loading config '{}': {}", path, e);
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let ledger = load_ledger(&path);
    info!(
        "settling {} ({} participants, {} expenses)",
        path,
        ledger.participants().len(),
        ledger.expenses().len()
    );
    let planner = config.planner();

    if format == "json" {
        let sheet = BalanceCalculator::compute(&ledger);
        let plan = planner.compute_payments(sheet.balances());
        let output = SettleOutput {
            currency: config.currency.to_string(),
            total_amount: ledger.total_amount().to_string(),
            balanced: sheet.is_balanced_within(config.tolerance),
            settled: plan.is_settled(),
            balances: sheet.balances(),
            payments: plan.instructions(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding result: {}", e);
                process::exit(1);
            }
        }
    } else {
        let summary = BillSummary::new(&ledger, &planner).with_currency(config.currency);
        print!("{}", summary);
    }
}

fn cmd_share(args: &[String]) {
    let mut input_path = None;
    let mut info = PaymentInfo::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input"));
            }
            "--promptpay" => {
                i += 1;
                info.promptpay = next_value(args, i, "--promptpay");
            }
            "--account-name" => {
                i += 1;
                info.account_name = next_value(args, i, "--account-name");
            }
            "--full-name" => {
                i += 1;
                info.full_name = next_value(args, i, "--full-name");
            }
            "--bank-name" => {
                i += 1;
                info.bank_name = next_value(args, i, "--bank-name");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let ledger = load_ledger(&path);
    let payload = SharePayload::from_ledger(&ledger, Some(info), Utc::now());
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error encoding share payload: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = RandomBillConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
                config.max_split = config.participant_count;
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(next_value(args, i, "--output"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = generate_random_ledger(&config);
    let json = serde_json::to_string_pretty(&ledger).unwrap_or_else(|e| {
        eprintln!("Error encoding bill: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            ledger.expenses().len(),
            ledger.participants().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "share" => cmd_share(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
