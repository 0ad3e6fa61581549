// SPDX-FileCopyrightText: 2026 Tally Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameterized statements.
//!
//! SQL text and its positional parameters always travel separately; values
//! are bound by SQLite, never interpolated into the statement.

use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

/// A positional parameter bound to `?N` in a statement.
#[derive(Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Text that is stored as-is but rendered as `[REDACTED]` in logs.
    Secret(String),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Null => ToSqlOutput::Owned(Value::Null),
            SqlParam::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlParam::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SqlParam::Text(s) | SqlParam::Secret(s) => {
                ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))
            }
        })
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Null => f.write_str("NULL"),
            SqlParam::Integer(i) => write!(f, "{i}"),
            SqlParam::Real(r) => write!(f, "{r}"),
            SqlParam::Text(s) => write!(f, "{s:?}"),
            SqlParam::Secret(_) => f.write_str("[REDACTED]"),
        }
    }
}

// Debug goes through Display so secrets never reach `{:?}` output either.
impl fmt::Debug for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Integer(v)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Real(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Integer(i64::from(v))
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlParam::Null, Into::into)
    }
}

/// One SQL statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: &'static str,
    pub params: Vec<SqlParam>,
}

impl Statement {
    pub fn new(sql: &'static str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Append the next positional parameter.
    pub fn bind(mut self, value: impl Into<SqlParam>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Append a parameter that must not appear in logs.
    pub fn bind_secret(mut self, value: &str) -> Self {
        self.params.push(SqlParam::Secret(value.to_string()));
        self
    }

    /// Parameters rendered for log output, secrets redacted.
    pub fn params_for_log(&self) -> String {
        let rendered: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("[{}]", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_preserves_order() {
        let stmt = Statement::new("INSERT INTO t (a, b, c) VALUES (?1, ?2, ?3)")
            .bind(7_i64)
            .bind("x")
            .bind(1.5);
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Integer(7),
                SqlParam::Text("x".into()),
                SqlParam::Real(1.5)
            ]
        );
    }

    #[test]
    fn secrets_are_redacted_in_logs() {
        let stmt = Statement::new("INSERT INTO users (login, password) VALUES (?1, ?2)")
            .bind("alice")
            .bind_secret("hunter2");
        let rendered = stmt.params_for_log();
        assert_eq!(rendered, r#"["alice", [REDACTED]]"#);
        assert!(!format!("{stmt:?}").contains("hunter2"));
    }

    #[test]
    fn bool_and_option_conversions() {
        assert_eq!(SqlParam::from(true), SqlParam::Integer(1));
        assert_eq!(SqlParam::from(false), SqlParam::Integer(0));
        assert_eq!(SqlParam::from(None::<i64>), SqlParam::Null);
        assert_eq!(SqlParam::from(Some("m")), SqlParam::Text("m".into()));
    }

    #[test]
    fn secret_binds_its_plain_value() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let value: String = conn
            .query_row("SELECT ?1", [SqlParam::Secret("p1".into())], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "p1");
    }
}
