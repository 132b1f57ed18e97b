//! Statements against the `mysql_galera_hostgroups` table.
//!
//! Every function takes the storage handle explicitly and reports failures
//! as a [`StorageError`] tagged with the attempted [`Operation`].

use super::error::{Operation, StorageError};
use crate::mapping::error::DecodeError;
use crate::mapping::{HostgroupMapping, TABLE};
use crate::record::{Record, Value};
use crate::storage::Storage;

fn key_param(key: u32) -> [Value; 1] {
    [Value::from(key)]
}

/// Whether a mapping with the given writer hostgroup is stored.
///
/// # Errors
///
/// Returns a [`StorageError`] for [`Operation::Count`] if the query fails or
/// its result cannot be read.
pub fn exists<S: Storage + ?Sized>(storage: &mut S, key: u32) -> Result<bool, StorageError> {
    let sql = format!(
        "SELECT count(*) AS galera_groups FROM {TABLE} WHERE {} = ?",
        HostgroupMapping::KEY
    );
    let rows = storage
        .query(&sql, &key_param(key))
        .map_err(|err| StorageError::new(Operation::Count, err))?;
    let count = rows
        .first()
        .and_then(|row| row.get("galera_groups"))
        .ok_or_else(|| {
            StorageError::new(
                Operation::Count,
                DecodeError::MissingColumn {
                    column: "galera_groups",
                },
            )
        })?;
    let count = count.as_i64().ok_or_else(|| {
        StorageError::new(
            Operation::Count,
            DecodeError::NotAnInteger {
                column: "galera_groups",
                value: count.clone(),
            },
        )
    })?;
    tracing::debug!(key, count, "counted galera hostgroups");
    Ok(count > 0)
}

/// Read the stored mapping for the given writer hostgroup.
///
/// # Errors
///
/// Returns a [`StorageError`] for [`Operation::Fetch`] if the query fails or
/// the row cannot be decoded.
pub fn fetch<S: Storage + ?Sized>(
    storage: &mut S,
    key: u32,
) -> Result<Option<HostgroupMapping>, StorageError> {
    let sql = format!("SELECT * FROM {TABLE} WHERE {} = ?", HostgroupMapping::KEY);
    let rows = storage
        .query(&sql, &key_param(key))
        .map_err(|err| StorageError::new(Operation::Fetch, err))?;
    let Some(row) = rows.first() else {
        tracing::debug!(key, "galera hostgroup not found");
        return Ok(None);
    };
    let mapping =
        HostgroupMapping::try_from(row).map_err(|err| StorageError::new(Operation::Fetch, err))?;
    tracing::debug!(key, ?mapping, "fetched galera hostgroup");
    Ok(Some(mapping))
}

pub(super) fn insert<S: Storage + ?Sized>(
    storage: &mut S,
    mapping: &HostgroupMapping,
) -> Result<(), StorageError> {
    let (names, params): (Vec<_>, Vec<_>) = mapping.columns().into_iter().unzip();
    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "INSERT INTO {TABLE} ({}) VALUES ({placeholders})",
        names.join(", ")
    );
    storage
        .execute(&sql, &params)
        .map_err(|err| StorageError::new(Operation::Insert, err))?;
    tracing::info!(key = mapping.writer_hostgroup(), "inserted galera hostgroup");
    Ok(())
}

/// `column` is always a column name known at compile time, never user input.
pub(super) fn update_column<S: Storage + ?Sized>(
    storage: &mut S,
    key: u32,
    column: &'static str,
    value: &Value,
) -> Result<(), StorageError> {
    let sql = format!(
        "UPDATE {TABLE} SET {column} = ? WHERE {} = ?",
        HostgroupMapping::KEY
    );
    storage
        .execute(&sql, &[value.clone(), Value::from(key)])
        .map_err(|err| StorageError::new(Operation::Update(column), err))?;
    tracing::info!(key, column, %value, "updated galera hostgroup column");
    Ok(())
}

pub(super) fn delete<S: Storage + ?Sized>(storage: &mut S, key: u32) -> Result<(), StorageError> {
    let sql = format!("DELETE FROM {TABLE} WHERE {} = ?", HostgroupMapping::KEY);
    storage
        .execute(&sql, &key_param(key))
        .map_err(|err| StorageError::new(Operation::Delete, err))?;
    tracing::info!(key, "deleted galera hostgroup");
    Ok(())
}
