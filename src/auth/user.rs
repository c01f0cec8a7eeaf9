//! The single user who owns the dashboard and their stored password hash.

use std::fmt::Display;

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// The ID of the only user of the application.
    pub const OWNER: UserID = UserID(1);

    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Set the password for the user `user_id`, creating the user if they do not exist.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn set_user_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user (id, password) VALUES (?1, ?2)
        ON CONFLICT(id) DO UPDATE SET password = excluded.password",
        params![user_id.as_i64(), password_hash.as_ref()],
    )?;

    Ok(())
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .query_one(
            "SELECT id, password FROM user WHERE id = ?1",
            params![user_id.as_i64()],
            |row| {
                let id = UserID::new(row.get(0)?);
                let raw_password_hash: String = row.get(1)?;

                Ok(User {
                    id,
                    password_hash: PasswordHash::new_unchecked(&raw_password_hash),
                })
            },
        )
        .map_err(Error::from)
}
