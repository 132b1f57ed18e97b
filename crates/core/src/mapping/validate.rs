use super::error::{Field, ValidationError};
use super::{HostgroupMapping, RawMapping, WriterIsAlsoReader};

fn non_negative(field: Field, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        Err(ValidationError::Negative { field, value })
    } else {
        Ok(())
    }
}

fn column_int(field: Field, value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::TooLarge {
        field,
        value,
        max: u32::MAX.into(),
    })
}

/// Validate raw input into a [`HostgroupMapping`].
///
/// Constraints are checked in a fixed order and the first violation is
/// reported:
///
/// 1. the four hostgroup ids are non-negative,
/// 2. the hostgroup ids are pairwise distinct,
/// 3. `active` is 0 or 1,
/// 4. `max_writers` is non-negative,
/// 5. `writer_is_also_reader` is 0, 1 or 2,
/// 6. `max_transactions_behind` is non-negative,
/// 7. every integer fits its column.
///
/// # Errors
///
/// Returns the [`ValidationError`] naming the offending field (or pair of
/// fields for [`ValidationError::NotDistinct`]).
pub fn validate(raw: &RawMapping) -> Result<HostgroupMapping, ValidationError> {
    let hostgroups = [
        (Field::WriterHostgroup, raw.writer_hostgroup),
        (Field::BackupWriterHostgroup, raw.backup_writer_hostgroup),
        (Field::ReaderHostgroup, raw.reader_hostgroup),
        (Field::OfflineHostgroup, raw.offline_hostgroup),
    ];
    for (field, value) in hostgroups {
        non_negative(field, value)?;
    }

    let pairs = [
        (
            (Field::BackupWriterHostgroup, raw.backup_writer_hostgroup),
            (Field::WriterHostgroup, raw.writer_hostgroup),
        ),
        (
            (Field::ReaderHostgroup, raw.reader_hostgroup),
            (Field::WriterHostgroup, raw.writer_hostgroup),
        ),
        (
            (Field::BackupWriterHostgroup, raw.backup_writer_hostgroup),
            (Field::ReaderHostgroup, raw.reader_hostgroup),
        ),
        (
            (Field::OfflineHostgroup, raw.offline_hostgroup),
            (Field::WriterHostgroup, raw.writer_hostgroup),
        ),
        (
            (Field::OfflineHostgroup, raw.offline_hostgroup),
            (Field::ReaderHostgroup, raw.reader_hostgroup),
        ),
        (
            (Field::BackupWriterHostgroup, raw.backup_writer_hostgroup),
            (Field::OfflineHostgroup, raw.offline_hostgroup),
        ),
    ];
    if let Some(((first, _), (second, _))) = pairs.iter().find(|((_, a), (_, b))| a == b) {
        return Err(ValidationError::NotDistinct {
            first: *first,
            second: *second,
        });
    }

    let active = match raw.active {
        0 => false,
        1 => true,
        value => return Err(ValidationError::ActiveOutOfRange { value }),
    };
    non_negative(Field::MaxWriters, raw.max_writers)?;
    let writer_is_also_reader = WriterIsAlsoReader::from_i64(raw.writer_is_also_reader).ok_or(
        ValidationError::WriterIsAlsoReaderOutOfRange {
            value: raw.writer_is_also_reader,
        },
    )?;
    non_negative(Field::MaxTransactionsBehind, raw.max_transactions_behind)?;

    Ok(HostgroupMapping {
        writer_hostgroup: column_int(Field::WriterHostgroup, raw.writer_hostgroup)?,
        backup_writer_hostgroup: column_int(
            Field::BackupWriterHostgroup,
            raw.backup_writer_hostgroup,
        )?,
        reader_hostgroup: column_int(Field::ReaderHostgroup, raw.reader_hostgroup)?,
        offline_hostgroup: column_int(Field::OfflineHostgroup, raw.offline_hostgroup)?,
        active,
        max_writers: column_int(Field::MaxWriters, raw.max_writers)?,
        writer_is_also_reader,
        max_transactions_behind: column_int(
            Field::MaxTransactionsBehind,
            raw.max_transactions_behind,
        )?,
        comment: raw.comment.clone(),
    })
}

impl TryFrom<RawMapping> for HostgroupMapping {
    type Error = ValidationError;

    fn try_from(raw: RawMapping) -> Result<Self, Self::Error> {
        validate(&raw)
    }
}
