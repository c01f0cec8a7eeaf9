//! Storing transactions and reading them back for the charts.

use rusqlite::{Connection, params, types::Value};
use time::Date;

use crate::{
    Error,
    account::AccountId,
    aggregation::{Transaction, TransactionType},
};

pub type TransactionId = i64;

/// A validated request to record income or an expense against an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The account the money went into or came out of.
    pub account_id: AccountId,
    /// The amount of money, always zero or more.
    pub amount: f64,
    /// Whether the money came in or went out.
    pub kind: TransactionType,
    /// The day the transaction happened.
    pub date: Date,
    /// A short note about the transaction.
    pub description: String,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date
            ON \"transaction\"(account_id, date)",
        (),
    )?;

    Ok(())
}

/// Save `transaction` to the database.
///
/// `today` is the current date in the user's timezone and is used to reject
/// transactions dated in the future.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative, NaN or infinite,
/// - [Error::InvalidTransactionType] if the type is neither income nor expense,
/// - [Error::FutureDate] if the date is after `today`,
/// - [Error::InvalidAccount] if the account does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    today: Date,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    if !transaction.amount.is_finite() || transaction.amount < 0.0 {
        return Err(Error::InvalidAmount(transaction.amount));
    }

    if let TransactionType::Unknown(kind) = &transaction.kind {
        return Err(Error::InvalidTransactionType(kind.clone()));
    }

    if transaction.date > today {
        return Err(Error::FutureDate(transaction.date));
    }

    connection
        .execute(
            "INSERT INTO \"transaction\" (account_id, amount, type, date, description)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                transaction.account_id,
                transaction.amount,
                transaction.kind.as_str(),
                transaction.date,
                transaction.description.trim(),
            ],
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 787 => {
                Error::InvalidAccount(transaction.account_id)
            }
            error => error.into(),
        })?;

    Ok(connection.last_insert_rowid())
}

/// Get the transactions of `account`, or of every account if `None`, in the
/// shape the chart aggregation expects.
///
/// Dates, amounts and types are returned as stored, the aggregation decides
/// what to do with values it cannot read. A malformed row never fails the read.
pub fn get_chart_transactions(
    account: Option<AccountId>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let map_row = |row: &rusqlite::Row| -> Result<Transaction, rusqlite::Error> {
        Ok(Transaction {
            date: value_to_text(row.get(0)?),
            amount: value_to_amount(row.get(1)?),
            kind: TransactionType::from(value_to_text(row.get(2)?)),
        })
    };

    let transactions = match account {
        Some(account_id) => connection
            .prepare(
                "SELECT date, amount, type FROM \"transaction\"
                WHERE account_id = ?1 ORDER BY id ASC",
            )?
            .query_map(params![account_id], map_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => connection
            .prepare("SELECT date, amount, type FROM \"transaction\" ORDER BY id ASC")?
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(transactions)
}

/// Anything that is not a number becomes NaN, which the aggregation rejects.
fn value_to_amount(value: Value) -> f64 {
    match value {
        Value::Real(amount) => amount,
        Value::Integer(amount) => amount as f64,
        Value::Null | Value::Text(_) | Value::Blob(_) => f64::NAN,
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Text(text) => text,
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Null | Value::Blob(_) => String::new(),
    }
}

/// Count the transactions recorded against `account`.
#[cfg(test)]
pub fn count_transactions(account: AccountId, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE account_id = ?1",
            params![account],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod create_transaction_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::create_account,
        aggregation::TransactionType,
        db::initialize,
    };

    use super::{NewTransaction, count_transactions, create_transaction};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(account_id: i64) -> NewTransaction {
        NewTransaction {
            account_id,
            amount: 12.3,
            kind: TransactionType::Expense,
            date: date!(2025 - 06 - 01),
            description: "Coffee".to_owned(),
        }
    }

    #[test]
    fn can_create_transaction() {
        let conn = get_test_connection();
        let account = create_account("Everyday", &conn).unwrap();

        let id = create_transaction(new_transaction(account.id), date!(2025 - 06 - 01), &conn);

        assert_eq!(id, Ok(1));
        assert_eq!(count_transactions(account.id, &conn), Ok(1));
    }

    #[test]
    fn rejects_negative_amount() {
        let conn = get_test_connection();
        let account = create_account("Everyday", &conn).unwrap();
        let transaction = NewTransaction {
            amount: -5.0,
            ..new_transaction(account.id)
        };

        let result = create_transaction(transaction, date!(2025 - 06 - 01), &conn);

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn rejects_infinite_amount() {
        let conn = get_test_connection();
        let account = create_account("Everyday", &conn).unwrap();
        let transaction = NewTransaction {
            amount: f64::INFINITY,
            ..new_transaction(account.id)
        };

        let result = create_transaction(transaction, date!(2025 - 06 - 01), &conn);

        assert_eq!(result, Err(Error::InvalidAmount(f64::INFINITY)));
    }

    #[test]
    fn rejects_unknown_type() {
        let conn = get_test_connection();
        let account = create_account("Everyday", &conn).unwrap();
        let transaction = NewTransaction {
            kind: TransactionType::from("TRANSFER"),
            ..new_transaction(account.id)
        };

        let result = create_transaction(transaction, date!(2025 - 06 - 01), &conn);

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("TRANSFER".to_owned()))
        );
    }

    #[test]
    fn rejects_future_date() {
        let conn = get_test_connection();
        let account = create_account("Everyday", &conn).unwrap();

        let result = create_transaction(new_transaction(account.id), date!(2025 - 05 - 31), &conn);

        assert_eq!(result, Err(Error::FutureDate(date!(2025 - 06 - 01))));
    }

    #[test]
    fn rejects_missing_account() {
        let conn = get_test_connection();

        let result = create_transaction(new_transaction(42), date!(2025 - 06 - 01), &conn);

        assert_eq!(result, Err(Error::InvalidAccount(42)));
    }
}
