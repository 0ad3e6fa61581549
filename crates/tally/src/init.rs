// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tally init` command implementation.

use tally_config::model::TallyConfig;
use tally_core::{StoreAdapter, TallyError};
use tally_storage::SqliteStore;
use tracing::info;

/// Create the database file and apply the schema. Safe to run repeatedly.
pub async fn run_init(config: &TallyConfig) -> Result<(), TallyError> {
    let store = SqliteStore::from_config(config);
    store.initialize().await?;
    info!(path = %config.storage.database_path, "schema initialized");
    println!("tally: database ready at {}", config.storage.database_path);
    Ok(())
}
