// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Tally persistence layer.
//!
//! TOML files are merged with `TALLY_*` environment overrides through Figment,
//! validated, and reported with miette diagnostics on failure.
//!
//! ```no_run
//! use tally_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TallyConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<TallyConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from one explicit file and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<TallyConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || read_sources([path]))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<TallyConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Run validation on success; convert Figment errors into diagnostics on failure.
///
/// Source files are only read when there is an error to point into.
fn finish(
    loaded: Result<TallyConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<TallyConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG.into());
    let mut paths = vec![local];
    paths.extend(loader::user_config_path());
    paths.push(loader::SYSTEM_CONFIG.into());
    read_sources(paths)
}

fn read_sources<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|p| {
            let p = p.as_ref();
            std::fs::read_to_string(p)
                .ok()
                .map(|content| (p.display().to_string(), content))
        })
        .collect()
}
