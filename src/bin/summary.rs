use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use serde::Serialize;

use fincti_rs::{
    AppConfig, AppState, Category, Error, TransactionType,
    challenge::run_challenge,
    dashboard::DashboardView,
    db::DEFAULT_DB_FILE_NAME,
    setup_logging,
    transaction::TransactionRow,
};

/// Print the dashboard and transactions stored in a fincti_rs database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = DEFAULT_DB_FILE_NAME)]
    db_path: String,

    /// Only include transactions with this type code ("0" expense, "1" income).
    #[arg(long = "type", value_parser = parse_type)]
    transaction_type: Option<TransactionType>,

    /// Only include transactions with this category code ("0" to "8").
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    /// Instead of the summary, print the 52 week challenge total for this
    /// weekly increment.
    #[arg(long, value_name = "INCREMENT")]
    challenge: Option<String>,
}

fn parse_type(code: &str) -> Result<TransactionType, Error> {
    code.parse()
}

fn parse_category(code: &str) -> Result<Category, Error> {
    code.parse()
}

#[derive(Serialize)]
struct Summary {
    dashboard: DashboardView,
    transactions: Vec<TransactionRow>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if let Err(error) = run(args).await {
        let alert = error.alert();
        eprintln!("{}", alert.message);
        if !alert.details.is_empty() {
            eprintln!("{}", alert.details);
        }
        exit(1);
    }
}

async fn run(args: Args) -> Result<(), Error> {
    if let Some(increment) = &args.challenge {
        let result = run_challenge(increment)?;
        println!("{}", result.message);
        println!("{}", result.details);

        return Ok(());
    }

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection, AppConfig::default())?;
    let mut controller = state.list_controller();

    if args.transaction_type.is_none() && args.category.is_none() {
        controller.refresh().await?;
    }

    if let Some(transaction_type) = args.transaction_type {
        controller.select_type(transaction_type).await?;
    }

    if let Some(category) = args.category {
        controller.select_category(category).await?;
    }

    let summary = Summary {
        dashboard: DashboardView::new(&controller.dashboard()),
        transactions: controller.rows(),
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(error) => {
                tracing::error!("Could not serialize the summary as JSON: {error}");
                exit(1);
            }
        }

        return Ok(());
    }

    println!("Balance: {}", summary.dashboard.balance);
    println!("Income:  {}", summary.dashboard.income);
    println!("Expense: {}", summary.dashboard.expense);

    if let Some(warning) = &summary.dashboard.warning {
        println!("{}", warning.message);
    }

    println!();

    for row in &summary.transactions {
        println!("{:>6}  {:<24} {}", row.id, row.label, row.amount);
    }

    Ok(())
}
