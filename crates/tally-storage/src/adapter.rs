// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the LedgerStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tally_config::model::{StorageConfig, TallyConfig};
use tally_core::{
    HealthStatus, InsertOutcome, LedgerStore, LedgerTransaction, LoginSession,
    PopupHistoryEntry, StoreAdapter, TallyError, User,
};

use crate::database::Database;
use crate::queries;
use crate::retry::RetryPolicy;
use crate::statement::Statement;

/// SQLite-backed ledger store.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. The schema is applied on the first call to
/// [`StoreAdapter::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    retry: RetryPolicy,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a store. Nothing touches the file until [`initialize`] is called.
    ///
    /// [`initialize`]: StoreAdapter::initialize
    pub fn new(config: StorageConfig, retry: RetryPolicy) -> Self {
        Self {
            config,
            retry,
            db: OnceCell::new(),
        }
    }

    /// Create a store over an existing file without applying the schema.
    ///
    /// The store is usable immediately; [`StoreAdapter::initialize`] would fail.
    pub fn attach(config: StorageConfig, retry: RetryPolicy) -> Self {
        let db = Database::attach(&config.database_path, retry, config.busy_timeout());
        Self {
            config,
            retry,
            db: OnceCell::from(db),
        }
    }

    pub fn from_config(config: &TallyConfig) -> Self {
        Self::new(config.storage.clone(), RetryPolicy::from(&config.retry))
    }

    /// Returns the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, TallyError> {
        self.db
            .get()
            .ok_or_else(|| TallyError::Internal("store not initialized, call initialize() first".into()))
    }
}

#[async_trait]
impl StoreAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn initialize(&self) -> Result<(), TallyError> {
        let db = Database::open(
            &self.config.database_path,
            self.retry,
            self.config.busy_timeout(),
        )
        .await?;
        self.db
            .set(db)
            .map_err(|_| TallyError::Internal("store already initialized".into()))?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// `Unhealthy` when `SELECT 1` fails, `Degraded` when tables are missing.
    async fn health_check(&self) -> Result<HealthStatus, TallyError> {
        let db = self.db()?;
        let select_one = db
            .query_first(&Statement::new("SELECT 1"), |row| row.get::<_, i64>(0))
            .await;
        match select_one {
            Ok(Some(1)) => {}
            Ok(other) => {
                return Ok(HealthStatus::Unhealthy(format!(
                    "unexpected SELECT 1 result: {other:?}"
                )));
            }
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        }

        let missing = match db.missing_tables().await {
            Ok(missing) => missing,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        if missing.is_empty() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(format!(
                "missing tables: {}",
                missing.join(", ")
            )))
        }
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn add_user(&self, login: &str, password: &str) -> Result<InsertOutcome, TallyError> {
        queries::users::add_user(self.db()?, login, password).await
    }

    async fn get_user(&self, login: &str) -> Result<Option<User>, TallyError> {
        queries::users::get_user(self.db()?, login).await
    }

    async fn add_transaction(
        &self,
        user_id: i64,
        amount: f64,
    ) -> Result<InsertOutcome, TallyError> {
        queries::transactions::add_transaction(self.db()?, user_id, amount).await
    }

    async fn get_transactions(&self, user_id: i64) -> Result<Vec<LedgerTransaction>, TallyError> {
        queries::transactions::get_transactions(self.db()?, user_id).await
    }

    async fn add_session(&self, tg_user_id: i64, login: &str) -> Result<InsertOutcome, TallyError> {
        queries::sessions::add_session(self.db()?, tg_user_id, login).await
    }

    async fn get_active_session(
        &self,
        tg_user_id: i64,
    ) -> Result<Option<LoginSession>, TallyError> {
        queries::sessions::get_active_session(self.db()?, tg_user_id).await
    }

    async fn deactivate_session(&self, tg_user_id: i64) -> Result<usize, TallyError> {
        queries::sessions::deactivate_session(self.db()?, tg_user_id).await
    }

    async fn add_popup_history(
        &self,
        user_id: i64,
        transaction_id: i64,
        message: &str,
    ) -> Result<i64, TallyError> {
        queries::popups::add_popup_history(self.db()?, user_id, transaction_id, message).await
    }

    async fn get_popup_history(&self, user_id: i64) -> Result<Vec<PopupHistoryEntry>, TallyError> {
        queries::popups::get_popup_history(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn make_store(path: &std::path::Path) -> SqliteStore {
        let config = StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            busy_timeout_ms: 0,
        };
        SqliteStore::new(config, RetryPolicy::new(1, Duration::ZERO))
    }

    #[tokio::test]
    async fn sqlite_store_identity() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir.path().join("test.db"));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
    }

    #[tokio::test]
    async fn initialize_creates_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = make_store(&db_path);

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir.path().join("double_init.db"));

        store.initialize().await.unwrap();
        let result = store.initialize().await;
        assert!(matches!(result, Err(TallyError::Internal(_))));
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir.path().join("no_init.db"));

        assert!(store.health_check().await.is_err());
        assert!(matches!(
            store.get_user("alice").await,
            Err(TallyError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn health_check_reports_healthy_then_degraded() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir.path().join("health.db"));
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);

        store
            .db()
            .unwrap()
            .execute(&Statement::new("DROP TABLE users_login_state"))
            .await
            .unwrap();
        match store.health_check().await.unwrap() {
            HealthStatus::Degraded(reason) => assert!(reason.contains("users_login_state")),
            other => panic!("expected Degraded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn attached_store_sees_the_file_as_is() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("attached.db");
        let store = make_store(&db_path);
        store.initialize().await.unwrap();
        store
            .db()
            .unwrap()
            .execute(&Statement::new("DROP TABLE users"))
            .await
            .unwrap();

        let attached = SqliteStore::attach(
            StorageConfig {
                database_path: db_path.to_str().unwrap().to_string(),
                busy_timeout_ms: 0,
            },
            RetryPolicy::no_retry(),
        );
        match attached.health_check().await.unwrap() {
            HealthStatus::Degraded(reason) => assert!(reason.contains("users")),
            other => panic!("expected Degraded, got {other:?}"),
        }
        assert!(attached.initialize().await.is_err());
    }

    #[tokio::test]
    async fn unreadable_file_is_unhealthy() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("garbage.db");
        std::fs::write(&db_path, b"this is not a sqlite database, just bytes").unwrap();

        let store = SqliteStore::attach(
            StorageConfig {
                database_path: db_path.to_str().unwrap().to_string(),
                busy_timeout_ms: 0,
            },
            RetryPolicy::no_retry(),
        );
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn full_bot_flow_through_store() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir.path().join("flow.db"));
        store.initialize().await.unwrap();

        let uid = store.add_user("alice", "p1").await.unwrap().id().unwrap();
        assert_eq!(
            store.add_user("alice", "other").await.unwrap(),
            InsertOutcome::AlreadyExists
        );

        let tx = store.add_transaction(uid, 25.0).await.unwrap().id().unwrap();
        store.add_session(1001, "alice").await.unwrap();
        store
            .add_popup_history(uid, tx, "Balance topped up by 25.0")
            .await
            .unwrap();

        let session = store.get_active_session(1001).await.unwrap().unwrap();
        let login = session.login.as_deref().unwrap();
        let user = store.get_user(login).await.unwrap().unwrap();
        assert_eq!(user.id, uid);
        assert_eq!(user.password, "p1");

        assert_eq!(store.get_transactions(uid).await.unwrap().len(), 1);
        assert_eq!(
            store.get_popup_history(uid).await.unwrap()[0].transaction_id,
            Some(tx)
        );

        assert_eq!(store.deactivate_session(1001).await.unwrap(), 1);
        assert!(store.get_active_session(1001).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_is_usable_as_trait_object() {
        let dir = tempdir().unwrap();
        let store: Box<dyn LedgerStore> = Box::new(make_store(&dir.path().join("dyn.db")));
        store.initialize().await.unwrap();
        assert!(store.add_user("bob", "pw").await.unwrap().is_created());
    }
}
