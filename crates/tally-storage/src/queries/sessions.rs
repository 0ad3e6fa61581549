// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login sessions binding an external (Telegram) user id to a login.
//!
//! Nothing in the schema limits a user to one active session; callers are
//! expected to [`deactivate_session`] before [`add_session`].

use rusqlite::Row;
use tally_core::{InsertOutcome, LoginSession, TallyError};
use tracing::{info, warn};

use crate::database::Database;
use crate::statement::Statement;

const INSERT_SESSION: &str = "INSERT INTO users_login_state (tg_user_id, login) VALUES (?1, ?2)";
const SELECT_ACTIVE_SESSION: &str = "SELECT id, tg_user_id, login, active FROM users_login_state
     WHERE tg_user_id = ?1 AND active = 1 ORDER BY id LIMIT 1";
const DEACTIVATE_SESSIONS: &str = "UPDATE users_login_state SET active = 0 WHERE tg_user_id = ?1";

/// Record a new active session.
pub async fn add_session(
    db: &Database,
    tg_user_id: i64,
    login: &str,
) -> Result<InsertOutcome, TallyError> {
    let statement = Statement::new(INSERT_SESSION).bind(tg_user_id).bind(login);
    match db.execute(&statement).await {
        Ok(done) => {
            info!(tg_user_id, login, session_id = done.last_insert_id, "added session");
            Ok(InsertOutcome::Created(done.last_insert_id))
        }
        Err(err) if err.is_integrity() => {
            warn!(tg_user_id, login, error = %err, "session not added");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(err) => Err(err),
    }
}

/// The active session of an external user. The oldest wins if several are active.
pub async fn get_active_session(
    db: &Database,
    tg_user_id: i64,
) -> Result<Option<LoginSession>, TallyError> {
    let statement = Statement::new(SELECT_ACTIVE_SESSION).bind(tg_user_id);
    let session = db.query_first(&statement, session_from_row).await?;
    match &session {
        Some(s) => info!(tg_user_id, login = ?s.login, "retrieved active session"),
        None => warn!(tg_user_id, "active session not found"),
    }
    Ok(session)
}

/// Deactivate every session of an external user, not only the latest.
///
/// Returns the number of rows touched, which includes rows that were
/// already inactive.
pub async fn deactivate_session(db: &Database, tg_user_id: i64) -> Result<usize, TallyError> {
    let statement = Statement::new(DEACTIVATE_SESSIONS).bind(tg_user_id);
    let done = db.execute(&statement).await?;
    info!(tg_user_id, rows = done.rows_affected, "deactivated sessions");
    Ok(done.rows_affected)
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<LoginSession> {
    Ok(LoginSession {
        id: row.get(0)?,
        tg_user_id: row.get(1)?,
        login: row.get(2)?,
        active: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
    })
}
