// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered merging.
//!
//! Lookup order: `./tally.toml` > `~/.config/tally/tally.toml` > `/etc/tally/tally.toml`,
//! with `TALLY_` environment variables on top of all files.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TallyConfig;

pub(crate) const LOCAL_CONFIG: &str = "tally.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/tally/tally.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("tally.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tally/tally.toml`
/// 3. `~/.config/tally/tally.toml`
/// 4. `./tally.toml`
/// 5. `TALLY_*` environment variables
pub fn load_config() -> Result<TallyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<TallyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TallyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<TallyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TallyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the hierarchical Figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(TallyConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// Environment provider mapping `TALLY_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name becomes a dot, so
/// `TALLY_STORAGE_DATABASE_PATH` maps to `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("TALLY_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = ["storage", "retry", "logging"]
            .iter()
            .find_map(|section| {
                key_str
                    .as_str()
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.clone());
        mapped.into()
    })
}
