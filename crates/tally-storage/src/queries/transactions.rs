// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only balance ledger.

use rusqlite::Row;
use tally_core::{InsertOutcome, LedgerTransaction, TallyError};
use tracing::{info, warn};

use crate::database::Database;
use crate::statement::Statement;

const INSERT_TRANSACTION: &str = "INSERT INTO users_transaction (user_id, amount) VALUES (?1, ?2)";
const SELECT_TRANSACTIONS_BY_USER: &str =
    "SELECT id, user_id, amount, date FROM users_transaction WHERE user_id = ?1 ORDER BY id";

/// Append a signed balance delta for a user.
///
/// Entries are never updated or deleted.
pub async fn add_transaction(
    db: &Database,
    user_id: i64,
    amount: f64,
) -> Result<InsertOutcome, TallyError> {
    let statement = Statement::new(INSERT_TRANSACTION).bind(user_id).bind(amount);
    match db.execute(&statement).await {
        Ok(done) => {
            info!(user_id, amount, transaction_id = done.last_insert_id, "added transaction");
            Ok(InsertOutcome::Created(done.last_insert_id))
        }
        Err(err) if err.is_integrity() => {
            warn!(user_id, amount, error = %err, "transaction not added");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(err) => Err(err),
    }
}

/// All ledger entries of a user, oldest first.
pub async fn get_transactions(
    db: &Database,
    user_id: i64,
) -> Result<Vec<LedgerTransaction>, TallyError> {
    let statement = Statement::new(SELECT_TRANSACTIONS_BY_USER).bind(user_id);
    let transactions = db.query(&statement, transaction_from_row).await?;
    info!(user_id, count = transactions.len(), "retrieved transactions");
    Ok(transactions)
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerTransaction> {
    Ok(LedgerTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}
