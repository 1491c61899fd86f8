//! Backend-agnostic SQL values and result rows

use serde::{Deserialize, Serialize};

use super::error::{StorageError, StorageResult};

/// A bound parameter or a column value
///
/// The cache only stores integers and text; booleans and timestamps are
/// not needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One result row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: Vec<SqlValue>,
}

/// Query result; empty when nothing matched
pub type Rows = Vec<Row>;

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    fn value(&self, index: usize) -> StorageResult<&SqlValue> {
        self.values.get(index).ok_or_else(|| StorageError::Decode {
            index,
            message: format!("row has only {} columns", self.values.len()),
        })
    }

    /// Nullable integer column.
    pub fn get_opt_i64(&self, index: usize) -> StorageResult<Option<i64>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Int(v) => Ok(Some(*v)),
            SqlValue::Text(text) => text.parse().map(Some).map_err(|_| StorageError::Decode {
                index,
                message: format!("expected an integer, found '{text}'"),
            }),
        }
    }

    /// Non-null integer column.
    pub fn get_i64(&self, index: usize) -> StorageResult<i64> {
        self.get_opt_i64(index)?.ok_or_else(|| StorageError::Decode {
            index,
            message: "unexpected NULL".to_string(),
        })
    }

    /// Nullable text column; integers are rendered as decimal text.
    pub fn get_opt_string(&self, index: usize) -> StorageResult<Option<String>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Int(v) => Ok(Some(v.to_string())),
            SqlValue::Text(text) => Ok(Some(text.clone())),
        }
    }

    /// Non-null text column.
    pub fn get_string(&self, index: usize) -> StorageResult<String> {
        self.get_opt_string(index)?.ok_or_else(|| StorageError::Decode {
            index,
            message: "unexpected NULL".to_string(),
        })
    }
}

/// Check that `name` is a plain SQL identifier safe to splice into DDL.
///
/// # Errors
/// Returns [`StorageError::InvalidIdentifier`] unless `name` matches
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> StorageResult<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidIdentifier(name.to_string()))
    }
}
