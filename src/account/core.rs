use rusqlite::{Connection, params};

use crate::Error;

/// The database ID of an account.
pub type AccountId = i64;

/// A named bucket that transactions are recorded against, e.g. a bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account, unique across accounts.
    pub name: String,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    Ok(Account { id, name })
}

/// Create an account called `name`.
///
/// Leading and trailing whitespace is removed from `name` before it is saved.
///
/// # Errors
/// Returns [Error::EmptyAccountName] if `name` is blank,
/// [Error::DuplicateAccountName] if an account with the same name exists, or
/// [Error::SqlError] for any other database error.
pub fn create_account(name: &str, connection: &Connection) -> Result<Account, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyAccountName);
    }

    connection
        .execute("INSERT INTO account (name) VALUES (?1)", params![name])
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                Error::DuplicateAccountName(name.to_owned())
            }
            error => error.into(),
        })?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
    })
}

/// Get the account with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if no account has the ID `id`.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_one(
            "SELECT id, name FROM account WHERE id = ?1",
            params![id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get every account ordered by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name FROM account ORDER BY name ASC")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}
