use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finwise::{
    NewTransaction, PasswordHash, TransactionType, UserID, ValidatedPassword, create_account,
    create_transaction, initialize_db, set_user_password,
};

/// A utility for creating a test database for the FinWise server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to generate.
    #[arg(long, default_value_t = 200)]
    days: i64,
}

/// Create and populate a database for manual testing.
///
/// The log-in password is "test".
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    set_user_password(UserID::OWNER, &password_hash, &conn)?;

    println!("Creating accounts...");
    let everyday = create_account("Everyday", &conn)?;
    let savings = create_account("Savings", &conn)?;

    println!("Creating transactions for the last {} days...", args.days);
    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for days_ago in (0..args.days).rev() {
        let date = today - Duration::days(days_ago);
        let mut transactions = vec![NewTransaction {
            account_id: everyday.id,
            amount: 150.0 + (days_ago % 7) as f64 * 45.5,
            kind: TransactionType::Expense,
            date,
            description: "Groceries".to_owned(),
        }];

        if days_ago % 30 == 0 {
            transactions.push(NewTransaction {
                account_id: everyday.id,
                amount: 65_000.0,
                kind: TransactionType::Income,
                date,
                description: "Salary".to_owned(),
            });
            transactions.push(NewTransaction {
                account_id: savings.id,
                amount: 10_000.0,
                kind: TransactionType::Income,
                date,
                description: "Monthly savings".to_owned(),
            });
            transactions.push(NewTransaction {
                account_id: everyday.id,
                amount: 18_000.0,
                kind: TransactionType::Expense,
                date,
                description: "Rent".to_owned(),
            });
        }

        for transaction in transactions {
            create_transaction(transaction, today, &conn)?;
            count += 1;
        }
    }

    // Rows written by other tools may not follow the app's validation.
    conn.execute(
        "INSERT INTO \"transaction\" (account_id, amount, type, date, description)
        VALUES (?1, 500.0, 'EXPENSE', 'not a date', 'Imported with a bad date')",
        (everyday.id,),
    )?;

    println!("Created {count} transactions and 1 malformed row.");
    println!("Success! Log in with the password \"test\".");

    Ok(())
}
