// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger entities and common types shared across the store trait boundary.

use serde::{Deserialize, Serialize};

/// A registered bot user.
///
/// The password is persisted exactly as given. `Debug` output omits it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password: String,
    pub balance: f64,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("balance", &self.balance)
            .finish()
    }
}

/// One immutable entry in a user's balance ledger.
///
/// Every column but `id` is nullable in the table, so each one is optional
/// here. SQLite stores a NaN amount as NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub id: i64,
    pub user_id: Option<i64>,
    /// Signed balance delta.
    pub amount: Option<f64>,
    /// Insertion timestamp as written by SQLite (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub date: Option<String>,
}

/// Binds an external messenger user id to a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    pub id: i64,
    pub tg_user_id: Option<i64>,
    pub login: Option<String>,
    /// A NULL flag reads as inactive.
    pub active: bool,
}

/// A notification shown to a user about a specific transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupHistoryEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub transaction_id: Option<i64>,
    pub date: Option<String>,
    pub message: Option<String>,
}

/// Result of an insert that tolerates duplicates.
///
/// Callers decide whether [`InsertOutcome::AlreadyExists`] counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOutcome {
    /// A new row was written with the given id.
    Created(i64),
    /// The store rejected the row on an integrity constraint.
    AlreadyExists,
}

impl InsertOutcome {
    /// Returns the new row id, if one was created.
    pub fn id(self) -> Option<i64> {
        match self {
            InsertOutcome::Created(id) => Some(id),
            InsertOutcome::AlreadyExists => None,
        }
    }

    pub fn is_created(self) -> bool {
        matches!(self, InsertOutcome::Created(_))
    }
}

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Store is fully operational.
    Healthy,
    /// Store answers but something is off (e.g. a table is missing).
    Degraded(String),
    /// Store is not operational.
    Unhealthy(String),
}
