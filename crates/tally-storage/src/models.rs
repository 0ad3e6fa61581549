// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for stored entities.
//!
//! The canonical types live in `tally-core::types` so they can cross the
//! store trait boundary. They are re-exported here for convenience.

pub use tally_core::types::{
    InsertOutcome, LedgerTransaction, LoginSession, PopupHistoryEntry, User,
};
