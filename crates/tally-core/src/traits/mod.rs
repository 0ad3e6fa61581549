// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for pluggable ledger stores.
//!
//! Traits use `#[async_trait]` so stores can be held as `Arc<dyn LedgerStore>`.

pub mod adapter;
pub mod storage;

pub use adapter::StoreAdapter;
pub use storage::LedgerStore;
