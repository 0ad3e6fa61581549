// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed four-table schema.
//!
//! Every table is created with `IF NOT EXISTS`, so applying the schema to an
//! existing file is a no-op. There is no migration history.

/// Tables owned by this crate, in creation order.
pub const TABLES: [&str; 4] = [
    "users",
    "users_transaction",
    "users_login_state",
    "all_transaction_popup_history",
];

pub(crate) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    login TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    balance REAL DEFAULT 0.0
);

CREATE TABLE IF NOT EXISTS users_transaction (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER,
    amount REAL,
    date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY(user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS users_login_state (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tg_user_id INTEGER,
    login TEXT,
    active BOOLEAN DEFAULT 1
);

CREATE TABLE IF NOT EXISTS all_transaction_popup_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER,
    transaction_id INTEGER,
    date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    message TEXT,
    FOREIGN KEY(user_id) REFERENCES users(id),
    FOREIGN KEY(transaction_id) REFERENCES users_transaction(id)
);
";

pub(crate) const LIST_TABLES: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name";
