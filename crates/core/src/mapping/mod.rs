//! The Galera hostgroup mapping record and its validation.

use core::fmt::{Display, Formatter, Result};

use self::error::DecodeError;
use crate::record::{Record, Row, Value};

pub mod error;
mod validate;

pub use validate::validate;

/// Name of the ProxySQL admin table holding Galera hostgroup mappings.
pub const TABLE: &str = "mysql_galera_hostgroups";

/// How writers take part in the reader hostgroup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum WriterIsAlsoReader {
    /// Writers are never placed in the reader hostgroup.
    #[default]
    Never,
    /// Writers are also placed in the reader hostgroup.
    Always,
    /// Only nodes demoted to the backup writer hostgroup also serve reads.
    BackupWritersOnly,
}

impl WriterIsAlsoReader {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Never => 0,
            Self::Always => 1,
            Self::BackupWritersOnly => 2,
        }
    }

    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Never),
            1 => Some(Self::Always),
            2 => Some(Self::BackupWritersOnly),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
impl ::serde::Serialize for WriterIsAlsoReader {
    fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Monitor check recorded in the optional `check_type` column.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CheckType {
    #[cfg_attr(feature = "serde", serde(rename = "read_only"))]
    ReadOnly,
    #[cfg_attr(feature = "serde", serde(rename = "innodb_read_only"))]
    InnodbReadOnly,
    #[cfg_attr(feature = "serde", serde(rename = "super_read_only"))]
    SuperReadOnly,
    #[cfg_attr(feature = "serde", serde(rename = "read_only|innodb_read_only"))]
    ReadOnlyOrInnodbReadOnly,
    #[cfg_attr(feature = "serde", serde(rename = "read_only&innodb_read_only"))]
    ReadOnlyAndInnodbReadOnly,
}

impl CheckType {
    pub const COLUMN: &'static str = "check_type";

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::InnodbReadOnly => "innodb_read_only",
            Self::SuperReadOnly => "super_read_only",
            Self::ReadOnlyOrInnodbReadOnly => "read_only|innodb_read_only",
            Self::ReadOnlyAndInnodbReadOnly => "read_only&innodb_read_only",
        }
    }
}

impl Display for CheckType {
    fn fmt(&self, f: &mut Formatter) -> Result {
        f.write_str(self.as_str())
    }
}

/// Mapping fields exactly as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMapping {
    pub writer_hostgroup: i64,
    pub backup_writer_hostgroup: i64,
    pub reader_hostgroup: i64,
    pub offline_hostgroup: i64,
    pub active: i64,
    pub max_writers: i64,
    pub writer_is_also_reader: i64,
    pub max_transactions_behind: i64,
    pub comment: String,
}

/// A validated Galera hostgroup mapping.
///
/// Values are only produced by [`validate()`] or by decoding a stored row,
/// and cannot be modified afterwards.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostgroupMapping {
    writer_hostgroup: u32,
    backup_writer_hostgroup: u32,
    reader_hostgroup: u32,
    offline_hostgroup: u32,
    active: bool,
    max_writers: u32,
    writer_is_also_reader: WriterIsAlsoReader,
    max_transactions_behind: u32,
    comment: String,
}

impl HostgroupMapping {
    #[must_use]
    pub const fn writer_hostgroup(&self) -> u32 {
        self.writer_hostgroup
    }

    #[must_use]
    pub const fn backup_writer_hostgroup(&self) -> u32 {
        self.backup_writer_hostgroup
    }

    #[must_use]
    pub const fn reader_hostgroup(&self) -> u32 {
        self.reader_hostgroup
    }

    #[must_use]
    pub const fn offline_hostgroup(&self) -> u32 {
        self.offline_hostgroup
    }

    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn max_writers(&self) -> u32 {
        self.max_writers
    }

    #[must_use]
    pub const fn writer_is_also_reader(&self) -> WriterIsAlsoReader {
        self.writer_is_also_reader
    }

    #[must_use]
    pub const fn max_transactions_behind(&self) -> u32 {
        self.max_transactions_behind
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

impl Record for HostgroupMapping {
    const KEY: &'static str = "writer_hostgroup";

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("writer_hostgroup", self.writer_hostgroup.into()),
            ("backup_writer_hostgroup", self.backup_writer_hostgroup.into()),
            ("reader_hostgroup", self.reader_hostgroup.into()),
            ("offline_hostgroup", self.offline_hostgroup.into()),
            ("active", self.active.into()),
            ("max_writers", self.max_writers.into()),
            (
                "writer_is_also_reader",
                i64::from(self.writer_is_also_reader.as_u8()).into(),
            ),
            ("max_transactions_behind", self.max_transactions_behind.into()),
            ("comment", self.comment.clone().into()),
        ]
    }
}

impl From<HostgroupMapping> for RawMapping {
    fn from(mapping: HostgroupMapping) -> Self {
        Self {
            writer_hostgroup: mapping.writer_hostgroup.into(),
            backup_writer_hostgroup: mapping.backup_writer_hostgroup.into(),
            reader_hostgroup: mapping.reader_hostgroup.into(),
            offline_hostgroup: mapping.offline_hostgroup.into(),
            active: mapping.active.into(),
            max_writers: mapping.max_writers.into(),
            writer_is_also_reader: mapping.writer_is_also_reader.as_u8().into(),
            max_transactions_behind: mapping.max_transactions_behind.into(),
            comment: mapping.comment,
        }
    }
}

fn integer(row: &Row, column: &'static str) -> core::result::Result<i64, DecodeError> {
    let value = row
        .get(column)
        .ok_or(DecodeError::MissingColumn { column })?;
    value.as_i64().ok_or_else(|| DecodeError::NotAnInteger {
        column,
        value: value.clone(),
    })
}

fn narrow<T: TryFrom<i64>>(row: &Row, column: &'static str) -> core::result::Result<T, DecodeError> {
    let value = integer(row, column)?;
    T::try_from(value).map_err(|_| DecodeError::OutOfRange { column, value })
}

impl TryFrom<&Row> for HostgroupMapping {
    type Error = DecodeError;

    fn try_from(row: &Row) -> core::result::Result<Self, Self::Error> {
        let active = match integer(row, "active")? {
            0 => false,
            1 => true,
            value => {
                return Err(DecodeError::OutOfRange {
                    column: "active",
                    value,
                })
            }
        };
        let writer_is_also_reader = integer(row, "writer_is_also_reader")?;
        let writer_is_also_reader = WriterIsAlsoReader::from_i64(writer_is_also_reader).ok_or(
            DecodeError::OutOfRange {
                column: "writer_is_also_reader",
                value: writer_is_also_reader,
            },
        )?;
        // ProxySQL declares `comment` nullable
        let comment = match row.get("comment") {
            None | Some(Value::Null) => String::new(),
            Some(Value::Text(text)) => text.clone(),
            Some(Value::Int(value)) => value.to_string(),
        };

        Ok(Self {
            writer_hostgroup: narrow(row, "writer_hostgroup")?,
            backup_writer_hostgroup: narrow(row, "backup_writer_hostgroup")?,
            reader_hostgroup: narrow(row, "reader_hostgroup")?,
            offline_hostgroup: narrow(row, "offline_hostgroup")?,
            active,
            max_writers: narrow(row, "max_writers")?,
            writer_is_also_reader,
            max_transactions_behind: narrow(row, "max_transactions_behind")?,
            comment,
        })
    }
}
