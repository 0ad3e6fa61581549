// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ledger store trait: users, ledger entries, login sessions, popup history.

use async_trait::async_trait;

use crate::error::TallyError;
use crate::traits::adapter::StoreAdapter;
use crate::types::{InsertOutcome, LedgerTransaction, LoginSession, PopupHistoryEntry, User};

/// Persistence operations used by the bot.
///
/// Each operation touches exactly one table. Inserts that may collide on a
/// constraint report [`InsertOutcome::AlreadyExists`] instead of failing;
/// lookups report absence as `None` or an empty `Vec`.
#[async_trait]
pub trait LedgerStore: StoreAdapter {
    /// Registers a user with a zero balance.
    async fn add_user(&self, login: &str, password: &str) -> Result<InsertOutcome, TallyError>;

    async fn get_user(&self, login: &str) -> Result<Option<User>, TallyError>;

    /// Appends a balance delta to a user's ledger.
    async fn add_transaction(&self, user_id: i64, amount: f64)
        -> Result<InsertOutcome, TallyError>;

    /// Returns a user's ledger entries in insertion order.
    async fn get_transactions(&self, user_id: i64) -> Result<Vec<LedgerTransaction>, TallyError>;

    /// Records a new, active login session for an external user id.
    async fn add_session(&self, tg_user_id: i64, login: &str)
        -> Result<InsertOutcome, TallyError>;

    async fn get_active_session(&self, tg_user_id: i64)
        -> Result<Option<LoginSession>, TallyError>;

    /// Deactivates every session of the external user id. Returns the number
    /// of rows touched.
    async fn deactivate_session(&self, tg_user_id: i64) -> Result<usize, TallyError>;

    /// Appends a popup notification. Constraint violations are returned as errors.
    async fn add_popup_history(
        &self,
        user_id: i64,
        transaction_id: i64,
        message: &str,
    ) -> Result<i64, TallyError>;

    async fn get_popup_history(&self, user_id: i64)
        -> Result<Vec<PopupHistoryEntry>, TallyError>;
}
