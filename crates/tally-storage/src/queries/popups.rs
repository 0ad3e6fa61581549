// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Popup notification history, append-only.

use rusqlite::Row;
use tally_core::{PopupHistoryEntry, TallyError};
use tracing::info;

use crate::database::Database;
use crate::statement::Statement;

const INSERT_POPUP: &str = "INSERT INTO all_transaction_popup_history (user_id, transaction_id, message)
     VALUES (?1, ?2, ?3)";
const SELECT_POPUPS_BY_USER: &str = "SELECT id, user_id, transaction_id, date, message
     FROM all_transaction_popup_history WHERE user_id = ?1 ORDER BY id";

/// Record a popup shown for a transaction. Returns the new entry id.
///
/// Unlike the other inserts, constraint violations are returned as errors.
pub async fn add_popup_history(
    db: &Database,
    user_id: i64,
    transaction_id: i64,
    message: &str,
) -> Result<i64, TallyError> {
    let statement = Statement::new(INSERT_POPUP)
        .bind(user_id)
        .bind(transaction_id)
        .bind(message);
    let done = db.execute(&statement).await?;
    info!(user_id, transaction_id, entry_id = done.last_insert_id, "added popup history");
    Ok(done.last_insert_id)
}

/// Popup history of a user, oldest first.
pub async fn get_popup_history(
    db: &Database,
    user_id: i64,
) -> Result<Vec<PopupHistoryEntry>, TallyError> {
    let statement = Statement::new(SELECT_POPUPS_BY_USER).bind(user_id);
    let history = db.query(&statement, popup_from_row).await?;
    info!(user_id, count = history.len(), "retrieved popup history");
    Ok(history)
}

fn popup_from_row(row: &Row<'_>) -> rusqlite::Result<PopupHistoryEntry> {
    Ok(PopupHistoryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        transaction_id: row.get(2)?,
        date: row.get(3)?,
        message: row.get(4)?,
    })
}
