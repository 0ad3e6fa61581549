// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Tally configuration system.

use tally_config::diagnostic::ConfigError;
use tally_config::model::TallyConfig;
use tally_config::{load_and_validate_str, load_config_from_str};

/// Every known key deserializes.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[storage]
database_path = "/var/lib/tally/bot.db"

[retry]
max_attempts = 5
delay_ms = 100

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.storage.database_path, "/var/lib/tally/bot.db");
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.delay_ms, 100);
    assert_eq!(config.logging.level, "debug");
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.storage.database_path, "bot_users.db");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay_ms, 2000);
    assert_eq!(config.logging.level, "info");
}

/// A dotted merge behaves like an env override of a single key.
#[test]
fn dotted_override_replaces_single_key() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: TallyConfig = Figment::new()
        .merge(Serialized::defaults(TallyConfig::default()))
        .merge(Toml::string("[storage]\ndatabase_path = \"from-toml.db\"\n"))
        .merge(("storage.database_path", "from-env.db"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.storage.database_path, "from-env.db");
    assert_eq!(config.retry.max_attempts, 3);
}

#[test]
fn misspelled_key_gets_suggestion() {
    let toml = r#"
[retry]
max_atempts = 4
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key should be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { key, suggestion, .. } if key == "max_atempts" => {
            suggestion.clone()
        }
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("max_attempts"));
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[retry]
delay_ms = "two seconds"
"#;

    let errors = load_and_validate_str(toml).expect_err("string delay should be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected an InvalidType error, got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_parse() {
    let toml = r#"
[retry]
max_attempts = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero attempts should fail validation");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("max_attempts"))));
}

#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[pool]\nsize = 4\n").expect_err("unknown section");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("pool"),
        "error should mention the unknown section, got: {err_str}"
    );
}
