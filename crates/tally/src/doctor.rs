// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tally doctor` command implementation.
//!
//! Runs diagnostic checks against the configured database without creating
//! or migrating anything.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use tally_config::model::TallyConfig;
use tally_core::{HealthStatus, StoreAdapter};
use tally_storage::schema::TABLES;
use tally_storage::{Database, RetryPolicy, SqliteStore, Statement};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `tally doctor` command and return the number of failed checks.
///
/// With `--deep`, also runs SQLite's integrity check.
/// With `--plain`, disables colored output.
pub async fn run_doctor(config: &TallyConfig, deep: bool, plain: bool) -> usize {
    let use_color = !plain && std::io::stdout().is_terminal();
    let path = config.storage.database_path.as_str();

    let store = SqliteStore::attach(config.storage.clone(), RetryPolicy::from(&config.retry));

    let mut results = vec![check_database(&store).await];
    if results[0].status == CheckStatus::Pass
        && let Ok(db) = store.db()
    {
        results.extend(check_tables(db).await);
        if deep {
            results.push(check_integrity(db).await);
        }
    }

    println!();
    println!("  tally doctor ({path})");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warned = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();
    match failed + warned {
        0 => println!("  All checks passed."),
        1 => println!("  1 issue found."),
        n => println!("  {n} issues found."),
    }
    if failed > 0 && !Path::new(path).exists() {
        println!("  Run `tally init` to create the database.");
    }
    println!();

    failed
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal().to_string()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow().to_string()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Database file exists and the store's health check gets an answer.
///
/// Missing tables are left to [`check_tables`], which names them.
async fn check_database(store: &SqliteStore) -> CheckResult {
    let start = Instant::now();
    let db_path = match store.db() {
        Ok(db) => db.path().to_path_buf(),
        Err(e) => return CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    };
    if !db_path.exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("not found: {}", db_path.display()),
            start,
        );
    }

    match store.health_check().await {
        Ok(HealthStatus::Healthy | HealthStatus::Degraded(_)) => {
            CheckResult::new("Database", CheckStatus::Pass, "connected", start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("query failed: {reason}"),
            start,
        ),
        Err(e) => CheckResult::new("Database", CheckStatus::Fail, e.to_string(), start),
    }
}

/// One result per expected table.
async fn check_tables(db: &Database) -> Vec<CheckResult> {
    let start = Instant::now();
    match db.missing_tables().await {
        Ok(missing) => TABLES
            .iter()
            .map(|table| {
                let name = format!("Table {table}");
                if missing.contains(table) {
                    CheckResult::new(&name, CheckStatus::Fail, "missing", start)
                } else {
                    CheckResult::new(&name, CheckStatus::Pass, "present", start)
                }
            })
            .collect(),
        Err(e) => vec![CheckResult::new(
            "Tables",
            CheckStatus::Fail,
            format!("listing failed: {e}"),
            start,
        )],
    }
}

/// Deep check: `PRAGMA integrity_check`.
async fn check_integrity(db: &Database) -> CheckResult {
    let start = Instant::now();
    match db
        .query(&Statement::new("PRAGMA integrity_check"), |row| {
            row.get::<_, String>(0)
        })
        .await
    {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new("DB integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("{} issue(s) found", rows.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("check failed: {e}"),
            start,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(path: &Path) -> SqliteStore {
        let mut config = TallyConfig::default();
        config.storage.database_path = path.to_str().unwrap().to_string();
        config.storage.busy_timeout_ms = 0;
        SqliteStore::attach(config.storage, RetryPolicy::no_retry())
    }

    async fn initialized_db(dir: &tempfile::TempDir) -> Database {
        Database::open(dir.path().join("bot.db"), RetryPolicy::no_retry(), Duration::ZERO)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_database_fails_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");

        let result = check_database(&attached(&path)).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("not found"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn initialized_database_passes_every_check() {
        let dir = tempfile::tempdir().unwrap();
        let db = initialized_db(&dir).await;

        let database = check_database(&attached(db.path())).await;
        assert_eq!(database.status, CheckStatus::Pass);

        let tables = check_tables(&db).await;
        assert_eq!(tables.len(), TABLES.len());
        assert!(tables.iter().all(|r| r.status == CheckStatus::Pass));

        assert_eq!(check_integrity(&db).await.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn dropped_table_is_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        let db = initialized_db(&dir).await;
        db.execute(&Statement::new("DROP TABLE users_transaction"))
            .await
            .unwrap();

        let failed: Vec<String> = check_tables(&db)
            .await
            .into_iter()
            .filter(|r| r.status == CheckStatus::Fail)
            .map(|r| r.name)
            .collect();
        assert_eq!(failed, vec!["Table users_transaction".to_string()]);
    }

    #[tokio::test]
    async fn run_doctor_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TallyConfig::default();
        config.storage.database_path = dir.path().join("absent.db").to_str().unwrap().to_string();
        assert_eq!(run_doctor(&config, false, true).await, 1);

        initialized_db(&dir).await;
        config.storage.database_path = dir.path().join("bot.db").to_str().unwrap().to_string();
        assert_eq!(run_doctor(&config, true, true).await, 0);
    }

    #[tokio::test]
    async fn non_database_file_fails_the_database_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        std::fs::write(&path, b"plain text pretending to be a database file").unwrap();

        let result = check_database(&attached(&path)).await;
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn plain_lines_are_tagged() {
        let result = CheckResult {
            name: "Database".to_string(),
            status: CheckStatus::Warn,
            message: "slow".to_string(),
            duration: Duration::from_millis(5),
        };
        let line = render_line(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("Database"));
        assert!(line.contains("(5ms)"));
    }
}
