// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User registration and lookup.

use rusqlite::Row;
use tally_core::{InsertOutcome, TallyError, User};
use tracing::{info, warn};

use crate::database::Database;
use crate::statement::Statement;

const INSERT_USER: &str = "INSERT INTO users (login, password) VALUES (?1, ?2)";
const SELECT_USER_BY_LOGIN: &str =
    "SELECT id, login, password, balance FROM users WHERE login = ?1";

/// Register a user with a zero balance.
///
/// The password is stored verbatim; it is only redacted in logs. A login that
/// is already taken yields [`InsertOutcome::AlreadyExists`].
pub async fn add_user(
    db: &Database,
    login: &str,
    password: &str,
) -> Result<InsertOutcome, TallyError> {
    let statement = Statement::new(INSERT_USER).bind(login).bind_secret(password);
    match db.execute(&statement).await {
        Ok(done) => {
            info!(login, user_id = done.last_insert_id, "added user");
            Ok(InsertOutcome::Created(done.last_insert_id))
        }
        Err(err) if err.is_integrity() => {
            warn!(login, error = %err, "user not added: login already exists");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(err) => Err(err),
    }
}

/// Look a user up by login.
pub async fn get_user(db: &Database, login: &str) -> Result<Option<User>, TallyError> {
    let statement = Statement::new(SELECT_USER_BY_LOGIN).bind(login);
    let user = db.query_first(&statement, user_from_row).await?;
    match &user {
        Some(u) => info!(login, user_id = u.id, "retrieved user"),
        None => warn!(login, "user not found"),
    }
    Ok(user)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        login: row.get(1)?,
        password: row.get(2)?,
        balance: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
    })
}
