//! Dynamically typed rows and the column-wise diff of typed records.

use core::fmt::{Display, Formatter, Result};

/// A single column value as exchanged with storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// Interprets the value as an integer.
    ///
    /// Text holding a decimal integer is parsed, since the ProxySQL admin
    /// interface reports every column as text.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Null => None,
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(feature = "serde")]
impl ::serde::Serialize for Value {
    fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// A row returned by storage: column names mapped to values, in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// A typed record that can be flattened into named column values.
///
/// Two values of the same type always produce the same columns in the same
/// order, which is what [`diff`] relies on.
pub trait Record {
    /// Column identifying the record in storage.
    const KEY: &'static str;

    fn columns(&self) -> Vec<(&'static str, Value)>;
}

/// One column whose current value differs from the desired one.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: Value,
    pub new: Value,
}

/// Compare two records of the same shape column by column.
///
/// Returns one [`FieldChange`] per column whose value differs, in column
/// order. The key column is compared like any other.
pub fn diff<R: Record>(current: &R, desired: &R) -> Vec<FieldChange> {
    current
        .columns()
        .into_iter()
        .zip(desired.columns())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((field, old), (desired_field, new))| {
            debug_assert_eq!(field, desired_field);
            FieldChange { field, old, new }
        })
        .collect()
}
