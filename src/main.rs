//! rebalance-engine CLI
//!
//! Plan rebalancing transfers from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Plan transfers from a JSON file
//! rebalance-engine plan --input accounts.json
//!
//! # Output as JSON, charging 5 units per transfer
//! rebalance-engine plan --input accounts.json --format json --fee-per-transfer 5
//!
//! # Generate a random scenario for testing
//! rebalance-engine generate --closing 5 --recipients 20
//! ```

use rebalance_engine::allocation::fee::FeeSchedule;
use rebalance_engine::allocation::rebalance::RebalanceEngine;
use rebalance_engine::core::account::{ClosingAccount, RecipientAccount};
use rebalance_engine::core::transfer::Transfer;
use rebalance_engine::simulation::stress_test::{generate_scenario, ScenarioConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"rebalance-engine — waterfall fund rebalancing with operational fees

USAGE:
    rebalance-engine <COMMAND> [OPTIONS]

COMMANDS:
    plan        Plan the transfers that clear every recipient's credit
    generate    Generate a random account scenario (for testing)
    help        Show this message

OPTIONS (plan):
    --input <FILE>             Path to JSON accounts file
    --format <FORMAT>          Output format: text (default) or json
    --fee-per-transfer <N>     Fee charged per transfer (default: 10)

OPTIONS (generate):
    --closing <N>       Number of closing accounts (default: 5)
    --recipients <N>    Number of recipient accounts (default: 10)
    --headroom <N>      Surplus beyond total credit (default: 5000)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=debug

EXAMPLES:
    rebalance-engine plan --input accounts.json
    rebalance-engine plan --input accounts.json --format json
    rebalance-engine generate --closing 3 --recipients 12 --output test.json"#
    );
}

/// JSON schema for the accounts file.
#[derive(serde::Deserialize)]
struct AccountsFile {
    closing_accounts: Vec<ClosingAccount>,
    recipient_accounts: Vec<RecipientAccount>,
    #[serde(default)]
    fee_per_transfer: Option<u64>,
}

/// JSON output schema for a rebalance plan.
#[derive(serde::Serialize)]
struct PlanOutput<'a> {
    plan_id: String,
    computed_at: String,
    operational_fee: u64,
    charged_entries: usize,
    gross_total: u64,
    total_paid: u64,
    total_leftover: u64,
    transfers: &'a [Transfer],
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str, expects: &str) -> &'a str {
    args.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, expects);
        process::exit(1);
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("{} requires a number, got '{}'", flag, value);
        process::exit(1);
    })
}

fn load_accounts(path: &str) -> AccountsFile {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "closing_accounts": [ {{ "account_id": "acc1", "amount": 500 }} ],
  "recipient_accounts": [ {{ "account_id": "rec1", "credit": 400 }} ],
  "fee_per_transfer": 10
}}"#
        );
        process::exit(1);
    })
}

fn cmd_plan(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut fee_override: Option<u64> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input", "a file path").to_string());
            }
            "--format" => {
                i += 1;
                format = next_value(args, i, "--format", "'text' or 'json'").to_string();
            }
            "--fee-per-transfer" => {
                i += 1;
                let value = next_value(args, i, "--fee-per-transfer", "a number");
                fee_override = Some(parse_number(value, "--fee-per-transfer"));
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

    let file = load_accounts(&path);
    let schedule = fee_override
        .or(file.fee_per_transfer)
        .map(FeeSchedule::new)
        .unwrap_or_default();
    let engine = RebalanceEngine::new(schedule);

    let result = engine
        .rebalance(&file.closing_accounts, &file.recipient_accounts)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if format == "json" {
        let output = PlanOutput {
            plan_id: result.plan_id().to_string(),
            computed_at: result.computed_at().to_rfc3339(),
            operational_fee: result.operational_fee(),
            charged_entries: result.charged_entries(),
            gross_total: result.gross_total(),
            total_paid: result.total_paid(),
            total_leftover: result.total_leftover(),
            transfers: result.transfers(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing plan: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", result);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = ScenarioConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--closing" => {
                i += 1;
                config.closing_count =
                    parse_number(next_value(args, i, "--closing", "a number"), "--closing");
            }
            "--recipients" => {
                i += 1;
                config.recipient_count =
                    parse_number(next_value(args, i, "--recipients", "a number"), "--recipients");
            }
            "--headroom" => {
                i += 1;
                config.headroom =
                    parse_number(next_value(args, i, "--headroom", "a number"), "--headroom");
            }
            "--output" => {
                i += 1;
                output_path = Some(next_value(args, i, "--output", "a file path").to_string());
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let scenario = generate_scenario(&config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let json = serde_json::to_string_pretty(&scenario).unwrap_or_else(|e| {
        eprintln!("Error serializing scenario: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} closing and {} recipient accounts → {}",
            scenario.closing_accounts.len(),
            scenario.recipient_accounts.len(),
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
        "plan" => cmd_plan(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
