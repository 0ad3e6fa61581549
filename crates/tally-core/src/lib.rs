// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tally bot persistence layer.
//!
//! Provides the error taxonomy, the ledger entity types, and the
//! [`LedgerStore`] trait implemented by storage backends.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, TallyError};
pub use traits::{LedgerStore, StoreAdapter};
pub use types::{
    HealthStatus, InsertOutcome, LedgerTransaction, LoginSession, PopupHistoryEntry, User,
};
