use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use fincti_rs::{
    Category, Label, Transaction, TransactionType,
    stores::{TransactionStore, sqlite::create_transaction_store},
};

/// A utility for creating a test database for fincti_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The smallest valid PNG, used as the photo of every test transaction.
const PLACEHOLDER_PHOTO: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = create_transaction_store(Connection::open(output_path)?)?;

    println!("Creating test transactions...");

    let fixtures = [
        ("Salary", 3200.0, TransactionType::Income, Category::Salary, "Monthly pay"),
        ("Rent", 1450.0, TransactionType::Expense, Category::Rent, ""),
        ("Coffee", 4.5, TransactionType::Expense, Category::Food, "Flat white"),
        ("Bus pass", 62.0, TransactionType::Expense, Category::Transportation, ""),
        ("Cinema", 18.0, TransactionType::Expense, Category::Entertainment, ""),
        ("Supermarket", 134.85, TransactionType::Expense, Category::Groceries, "Weekly shop"),
        ("Power", 96.4, TransactionType::Expense, Category::Bill, ""),
        ("Bike repair", 45.0, TransactionType::Expense, Category::Maintenance, "New chain"),
        ("Market stall", 120.0, TransactionType::Income, Category::Others, "Sold old books"),
    ];

    for (label, amount, transaction_type, category, description) in fixtures {
        store.insert(
            Transaction::build(Label::new(label)?, amount)
                .description(description)
                .transaction_type(transaction_type)
                .category(category)
                .photo(Some(PLACEHOLDER_PHOTO.to_vec())),
        )?;
    }

    println!("Success!");

    Ok(())
}
