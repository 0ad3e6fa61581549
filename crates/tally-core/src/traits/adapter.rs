// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and lifecycle trait shared by every store backend.

use async_trait::async_trait;

use crate::error::TallyError;
use crate::types::HealthStatus;

/// Identity, lifecycle, and health checks for a store backend.
#[async_trait]
pub trait StoreAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Returns the semantic version of this backend.
    fn version(&self) -> semver::Version;

    /// Prepares the backend for use (creates the schema if absent).
    async fn initialize(&self) -> Result<(), TallyError>;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, TallyError>;
}
