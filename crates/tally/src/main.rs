// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tally - persistence tooling for the balance bot.
//!
//! This is the binary entry point: schema initialization and database
//! diagnostics on top of `tally-storage`.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod init;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_config::model::TallyConfig;

/// Tally - persistence tooling for the balance bot.
#[derive(Parser, Debug)]
#[command(name = "tally", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Create the database file and its tables (the default).
    Init {
        /// Database file to use instead of `storage.database_path`.
        #[arg(long, value_name = "PATH")]
        database: Option<String>,
    },
    /// Check that the database answers and every table is present.
    Doctor {
        /// Database file to use instead of `storage.database_path`.
        #[arg(long, value_name = "PATH")]
        database: Option<String>,
        /// Also run SQLite's integrity check.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Init { database: None }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => tally_config::load_and_validate_path(path),
        None => tally_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tally_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    match cli.command.unwrap_or_default() {
        Commands::Init { database } => {
            override_database(&mut config, database);
            if let Err(e) = init::run_init(&config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Doctor {
            database,
            deep,
            plain,
        } => {
            override_database(&mut config, database);
            let failed = doctor::run_doctor(&config, deep, plain).await;
            if failed > 0 {
                std::process::exit(1);
            }
        }
    }
}

fn override_database(config: &mut TallyConfig, database: Option<String>) {
    if let Some(path) = database {
        config.storage.database_path = path;
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tally={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn no_subcommand_means_init() {
        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert_eq!(
            cli.command.unwrap_or_default(),
            Commands::Init { database: None }
        );
    }

    #[test]
    fn doctor_flags_parse() {
        let cli = Cli::try_parse_from([
            "tally", "doctor", "--database", "x.db", "--deep", "--config", "t.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
        assert_eq!(
            cli.command,
            Some(Commands::Doctor {
                database: Some("x.db".into()),
                deep: true,
                plain: false,
            })
        );
    }

    #[test]
    fn database_flag_overrides_config() {
        let mut config = TallyConfig::default();
        override_database(&mut config, None);
        assert_eq!(config.storage.database_path, "bot_users.db");
        override_database(&mut config, Some("other.db".into()));
        assert_eq!(config.storage.database_path, "other.db");
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["tally", "serve"]).is_err());
    }
}
