use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which document shape an event produces. Chosen by the format that parsed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Message text and reference time only
    Plain,
    /// Adds priority, app and pid
    Syslog,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Plain => "plain",
            EventKind::Syslog => "syslog",
        }
    }
}

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Str(String),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "integer",
            FieldValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

/// Field name → value mapping produced by one successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// String field, or a contract error if absent or not a string.
    pub fn str_field(&self, name: &str) -> Result<&str, FieldError> {
        match self.0.get(name) {
            Some(FieldValue::Str(v)) => Ok(v),
            Some(other) => Err(FieldError::WrongType {
                field: name.to_string(),
                expected: "string",
                found: other.type_name(),
            }),
            None => Err(FieldError::Missing(name.to_string())),
        }
    }

    /// Integer field, or a contract error if absent or not an integer.
    pub fn int_field(&self, name: &str) -> Result<i64, FieldError> {
        match self.0.get(name) {
            Some(FieldValue::Int(v)) => Ok(*v),
            Some(other) => Err(FieldError::WrongType {
                field: name.to_string(),
                expected: "integer",
                found: other.type_name(),
            }),
            None => Err(FieldError::Missing(name.to_string())),
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field `{0}` is missing")]
    Missing(String),

    #[error("field `{field}` holds a {found}, expected a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown format: {0}")]
    FormatUnknown(String),

    #[error("Message does not match format {0}")]
    NoMatch(&'static str),

    #[error("Invalid pattern for format {format}: {reason}")]
    InvalidPattern {
        format: &'static str,
        reason: String,
    },
}
