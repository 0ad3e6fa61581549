// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository operations, one module per table.
//!
//! Every operation is a single statement run through
//! [`Database`](crate::database::Database). Inserts that can collide on a
//! constraint return [`InsertOutcome::AlreadyExists`](tally_core::InsertOutcome)
//! instead of an error.

pub mod popups;
pub mod sessions;
pub mod transactions;
pub mod users;
