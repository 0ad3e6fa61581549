// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Tally bot.
//!
//! Every statement goes through [`Database`], which opens a fresh connection
//! per attempt, wraps the statement in a transaction, logs failures with
//! redacted parameters, and retries busy/locked conditions per
//! [`RetryPolicy`]. Typed operations for users, the balance ledger, login
//! sessions, and popup history live in [`queries`]; [`SqliteStore`] exposes
//! them through the [`tally_core::LedgerStore`] trait.

pub mod adapter;
pub mod database;
pub mod models;
pub mod queries;
pub mod retry;
pub mod schema;
pub mod statement;

pub use adapter::SqliteStore;
pub use database::{Database, Executed};
pub use models::*;
pub use retry::RetryPolicy;
pub use statement::{SqlParam, Statement};
