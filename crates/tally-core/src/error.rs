// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tally persistence layer.
//!
//! Storage failures are classified once, at the execution wrapper, into
//! [`TallyError::Integrity`], [`TallyError::Transient`], [`TallyError::Storage`]
//! or [`TallyError::Unexpected`]. The classification drives both the retry
//! predicate and the duplicate handling of the insert operations.

use strum::{Display, EnumString};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type returned by every Tally store operation.
#[derive(Debug, Error)]
pub enum TallyError {
    /// A uniqueness, foreign-key or NOT NULL constraint was violated.
    #[error("integrity violation: {source}")]
    Integrity { source: BoxError },

    /// The database was busy or locked by another writer.
    #[error("database busy: {source}")]
    Transient { source: BoxError },

    /// Any other SQLite failure (missing table, corruption, cannot open, misuse).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Failures that did not originate in SQLite itself (type conversion,
    /// a closed connection worker).
    #[error("unexpected error: {source}")]
    Unexpected { source: BoxError },

    /// Internal or misuse errors, e.g. using a store before it is initialized.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`TallyError`], used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Integrity,
    Transient,
    Storage,
    Unexpected,
    Internal,
}

impl TallyError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TallyError::Integrity { .. } => ErrorKind::Integrity,
            TallyError::Transient { .. } => ErrorKind::Transient,
            TallyError::Storage { .. } => ErrorKind::Storage,
            TallyError::Unexpected { .. } => ErrorKind::Unexpected,
            TallyError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True when the store was temporarily unavailable and a retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TallyError::Transient { .. })
    }

    /// True for uniqueness and referential constraint breaches.
    pub fn is_integrity(&self) -> bool {
        matches!(self, TallyError::Integrity { .. })
    }
}
