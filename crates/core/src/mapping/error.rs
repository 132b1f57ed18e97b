use core::fmt::{Display, Formatter, Result};

/// Input field of a hostgroup mapping, named after its column.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    WriterHostgroup,
    BackupWriterHostgroup,
    ReaderHostgroup,
    OfflineHostgroup,
    Active,
    MaxWriters,
    WriterIsAlsoReader,
    MaxTransactionsBehind,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WriterHostgroup => "writer_hostgroup",
            Self::BackupWriterHostgroup => "backup_writer_hostgroup",
            Self::ReaderHostgroup => "reader_hostgroup",
            Self::OfflineHostgroup => "offline_hostgroup",
            Self::Active => "active",
            Self::MaxWriters => "max_writers",
            Self::WriterIsAlsoReader => "writer_is_also_reader",
            Self::MaxTransactionsBehind => "max_transactions_behind",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter) -> Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a raw mapping breaks one of its constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A column that must be `>= 0` was negative.
    #[error("{field} must be an integer greater than or equal to 0")]
    Negative { field: Field, value: i64 },
    /// Two of the four hostgroup ids coincide.
    #[error("{first} and {second} must be different integer values")]
    NotDistinct { first: Field, second: Field },
    #[error("active must be either 0 or 1")]
    ActiveOutOfRange { value: i64 },
    #[error("writer_is_also_reader must be an integer in 0, 1 or 2")]
    WriterIsAlsoReaderOutOfRange { value: i64 },
    /// The value does not fit the column's storage type.
    #[error("{field} must be an integer less than or equal to {max}")]
    TooLarge { field: Field, value: i64, max: u64 },
}

impl ValidationError {
    /// The field the violated constraint is about. For a pair of coinciding
    /// hostgroups this is the first of the pair.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Negative { field, .. }
            | Self::TooLarge { field, .. }
            | Self::NotDistinct { first: field, .. } => *field,
            Self::ActiveOutOfRange { .. } => Field::Active,
            Self::WriterIsAlsoReaderOutOfRange { .. } => Field::WriterIsAlsoReader,
        }
    }
}

/// Error decoding a storage row into a typed mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("column `{column}` is missing from the row")]
    MissingColumn { column: &'static str },
    #[error("column `{column}` holds {value}, expected an integer")]
    NotAnInteger {
        column: &'static str,
        value: crate::record::Value,
    },
    #[error("column `{column}` holds {value}, which is out of range")]
    OutOfRange { column: &'static str, value: i64 },
}
