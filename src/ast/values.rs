use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A literal value embedded in the SQL text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    /// NULL value
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Character data
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Date and time without zone
    Timestamp(NaiveDateTime),
}

impl Literal {
    /// The string payload, if this is a character literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer literal.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Parse a command-line style value: `null`, `true`/`false`, integers,
    /// floats, anything else is a string.
    pub fn parse_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("null") {
            return Literal::Null;
        }
        if let Ok(b) = trimmed.parse::<bool>() {
            return Literal::Boolean(b);
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Literal::Integer(n);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Literal::Float(f);
        }
        Literal::String(raw.to_string())
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Date(d) => write!(f, "date '{}'", d.format("%Y-%m-%d")),
            Literal::Time(t) => write!(f, "time '{}'", t.format("%H:%M:%S")),
            Literal::Timestamp(ts) => write!(f, "timestamp '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Integer(n as i64)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Integer(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<NaiveDate> for Literal {
    fn from(d: NaiveDate) -> Self {
        Literal::Date(d)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(ts: NaiveDateTime) -> Self {
        Literal::Timestamp(ts)
    }
}

/// A bind parameter slot. Rendered as a placeholder and reported back to the
/// caller in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JdbcParameter {
    /// Name of the query parameter this slot binds, if any.
    #[serde(default)]
    pub label: Option<String>,
    /// SQL type of the bound value, used where the dialect needs a typed slot.
    #[serde(default)]
    pub sql_type: Option<String>,
}

impl JdbcParameter {
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            sql_type: None,
        }
    }

    pub fn typed(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }
}

/// Values known at render time for named parameters. Only consulted when a
/// renderer needs a compile-time literal (e.g. a JSON path argument).
pub type ParameterBindings = HashMap<String, Literal>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loose() {
        assert_eq!(Literal::parse_loose("null"), Literal::Null);
        assert_eq!(Literal::parse_loose("true"), Literal::Boolean(true));
        assert_eq!(Literal::parse_loose("42"), Literal::Integer(42));
        assert_eq!(Literal::parse_loose("1.5"), Literal::Float(1.5));
        assert_eq!(Literal::parse_loose("$.a[0]"), Literal::String("$.a[0]".into()));
    }

    #[test]
    fn test_literal_serde_shape() {
        let json = serde_json::to_string(&Literal::Integer(7)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":7}"#);
        let back: Literal = serde_json::from_str(r#"{"type":"date","value":"2024-02-29"}"#).unwrap();
        assert_eq!(back, Literal::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }
}
