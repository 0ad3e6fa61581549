// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The execution wrapper.
//!
//! Every statement runs on a connection opened for that attempt alone:
//! open, begin, execute, commit, close. A failure rolls the transaction back,
//! is logged with the statement and its (redacted) parameters, and is
//! returned classified. Transient failures are retried per [`RetryPolicy`].
//!
//! No connection outlives a call, so no connection state is shared between
//! callers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params_from_iter, ErrorCode, Row};
use tally_core::TallyError;
use tracing::{debug, error, warn};

use crate::retry::RetryPolicy;
use crate::schema;
use crate::statement::{SqlParam, Statement};

/// Maps one result row to a value.
pub type RowMapper<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

/// Outcome of a statement that produces no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    pub rows_affected: usize,
    /// Rowid of the last successful INSERT on the attempt's connection.
    pub last_insert_id: i64,
}

/// Handle to a SQLite database file.
///
/// Cheap to clone; holds only the path and the policies, never a connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    retry: RetryPolicy,
    busy_timeout: Duration,
}

impl Database {
    /// Create a handle and apply the schema (idempotent).
    pub async fn open(
        path: impl AsRef<Path>,
        retry: RetryPolicy,
        busy_timeout: Duration,
    ) -> Result<Self, TallyError> {
        let db = Self::attach(path, retry, busy_timeout);
        db.apply_schema().await?;
        debug!(path = %db.path.display(), "database schema ready");
        Ok(db)
    }

    /// Create a handle without touching the file.
    ///
    /// Used by diagnostics that must observe the schema as it is.
    pub fn attach(path: impl AsRef<Path>, retry: RetryPolicy, busy_timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            retry,
            busy_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Run a statement that returns no rows.
    pub async fn execute(&self, statement: &Statement) -> Result<Executed, TallyError> {
        self.run(statement, |tx, sql, params| {
            let rows_affected = tx.execute(sql, params_from_iter(params.iter()))?;
            Ok(Executed {
                rows_affected,
                last_insert_id: tx.last_insert_rowid(),
            })
        })
        .await
    }

    /// Run a query and materialize every row it produces.
    pub async fn query<T>(
        &self,
        statement: &Statement,
        map_row: RowMapper<T>,
    ) -> Result<Vec<T>, TallyError>
    where
        T: Send + 'static,
    {
        self.run(statement, move |tx, sql, params| {
            let mut stmt = tx.prepare(sql)?;
            let rows = stmt
                .query_map(params_from_iter(params.iter()), map_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Run a query and keep only its first row.
    pub async fn query_first<T>(
        &self,
        statement: &Statement,
        map_row: RowMapper<T>,
    ) -> Result<Option<T>, TallyError>
    where
        T: Send + 'static,
    {
        Ok(self.query(statement, map_row).await?.into_iter().next())
    }

    /// Names of schema tables that are missing from the file.
    pub async fn missing_tables(&self) -> Result<Vec<&'static str>, TallyError> {
        let present = self
            .query(&Statement::new(schema::LIST_TABLES), |row| row.get::<_, String>(0))
            .await?;
        Ok(schema::TABLES
            .into_iter()
            .filter(|table| !present.iter().any(|name| name == table))
            .collect())
    }

    async fn apply_schema(&self) -> Result<(), TallyError> {
        self.run(&Statement::new(schema::SCHEMA), |tx, sql, _| {
            tx.execute_batch(sql)
        })
        .await
    }

    /// Retry loop around [`Database::attempt`]; logs every failed attempt.
    async fn run<T, F>(&self, statement: &Statement, op: F) -> Result<T, TallyError>
    where
        T: Send + 'static,
        F: Fn(&rusqlite::Transaction<'_>, &str, &[SqlParam]) -> rusqlite::Result<T>
            + Clone
            + Send
            + 'static,
    {
        self.retry
            .run(|attempt| {
                let op = op.clone();
                async move {
                    let result = self.attempt(statement.clone(), op).await;
                    if let Err(err) = &result {
                        error!(
                            error = %err,
                            kind = %err.kind(),
                            statement = statement.sql.trim(),
                            params = %statement.params_for_log(),
                            attempt,
                            "statement failed"
                        );
                    }
                    result
                }
            })
            .await
    }

    /// One open-begin-execute-commit cycle on a fresh connection.
    ///
    /// The transaction is rolled back if `op` fails; the connection is closed
    /// on every path.
    async fn attempt<T, F>(&self, statement: Statement, op: F) -> Result<T, TallyError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Transaction<'_>, &str, &[SqlParam]) -> rusqlite::Result<T>
            + Send
            + 'static,
    {
        let conn = tokio_rusqlite::Connection::open(&self.path)
            .await
            .map_err(classify)?;
        let busy_timeout = self.busy_timeout;

        let result = conn
            .call(move |conn| {
                conn.busy_timeout(busy_timeout)?;
                let tx = conn.transaction()?;
                match op(&tx, statement.sql, &statement.params) {
                    Ok(value) => {
                        tx.commit()?;
                        Ok(value)
                    }
                    Err(err) => {
                        if let Err(rollback_err) = tx.rollback() {
                            debug!(error = %rollback_err, "rollback failed");
                        }
                        Err(err)
                    }
                }
            })
            .await
            .map_err(map_tr_err);

        if let Err(close_err) = conn.close().await {
            warn!(error = %close_err, "failed to close sqlite connection");
        }
        result
    }
}

/// Classify a rusqlite error into the Tally error taxonomy.
pub(crate) fn classify(err: rusqlite::Error) -> TallyError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => TallyError::Transient {
            source: Box::new(err),
        },
        Some(ErrorCode::ConstraintViolation) => TallyError::Integrity {
            source: Box::new(err),
        },
        Some(_) => TallyError::Storage {
            source: Box::new(err),
        },
        None => TallyError::Unexpected {
            source: Box::new(err),
        },
    }
}

/// Convert a tokio-rusqlite error, classifying the SQLite error it wraps.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TallyError {
    match e {
        tokio_rusqlite::Error::Error(inner) => classify(inner),
        other => TallyError::Unexpected {
            source: Box::new(other),
        },
    }
}
