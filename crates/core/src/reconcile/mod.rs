//! Converging the stored mapping to a desired state.

use core::fmt::{Display, Formatter};

use self::error::{Operation, StorageError};
use crate::mapping::{CheckType, HostgroupMapping, TABLE};
use crate::record::{diff, FieldChange, Record, Value};
use crate::storage::{ConfigCategory, Storage};

pub mod error;
mod table;

pub use table::{exists, fetch};

/// Requested presence of the mapping.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Present,
    Absent,
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// What to do when writing a column that the server may not have.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum OptionalColumns {
    /// Log the failure and carry on.
    #[default]
    BestEffort,
    /// Fail the invocation.
    Required,
}

/// Knobs of a single [`Reconciler::converge`] run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Options {
    /// Report what would happen without issuing any mutating statement.
    pub check_mode: bool,
    /// Save `MYSQL SERVERS` to disk after a mutation.
    pub save_to_disk: bool,
    /// Load `MYSQL SERVERS` to runtime after a mutation.
    pub load_to_runtime: bool,
    /// Written once after an insert, as an optional column.
    pub check_type: Option<CheckType>,
    pub optional_columns: OptionalColumns,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            check_mode: false,
            save_to_disk: true,
            load_to_runtime: true,
            check_type: None,
            optional_columns: OptionalColumns::default(),
        }
    }
}

/// Result of a [`Reconciler::converge`] run.
#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub changed: bool,
    pub state: State,
    pub msg: String,
    /// Row after convergence; for a deletion, the row as it was before.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub hostgroup_mapping: Option<HostgroupMapping>,
    /// Column updates applied, or in check mode, those that would be.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub changes: Vec<FieldChange>,
}

/// Converges the stored mapping of one writer hostgroup to a desired state.
///
/// The reconciler borrows the storage handle for its lifetime and never
/// opens, closes or shares it. It assumes exclusive access to the row for the
/// duration of a run.
pub struct Reconciler<'a, S: ?Sized> {
    storage: &'a mut S,
    options: Options,
}

impl<'a, S: Storage + ?Sized> Reconciler<'a, S> {
    pub fn new(storage: &'a mut S, options: Options) -> Self {
        Self { storage, options }
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Bring the stored row keyed by `desired.writer_hostgroup()` to `state`.
    ///
    /// - [`State::Present`] inserts the row if missing, otherwise updates
    ///   every differing column with its own statement.
    /// - [`State::Absent`] deletes the row if present.
    ///
    /// After a real mutation, the `MYSQL SERVERS` category is saved to disk
    /// and/or loaded to runtime as configured.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`]. Statements already issued are not
    /// rolled back.
    ///
    /// Exchanging hostgroup ids between columns (for example swapping
    /// `reader_hostgroup` and `offline_hostgroup`) cannot be done one column
    /// at a time: the server's table constraints reject the first update,
    /// which is returned as its [`StorageError`].
    pub fn converge(
        &mut self,
        desired: &HostgroupMapping,
        state: State,
    ) -> Result<Outcome, StorageError> {
        let key = desired.writer_hostgroup();
        tracing::debug!(key, %state, check_mode = self.options.check_mode, "converging galera hostgroup");

        let current = fetch(&mut *self.storage, key)?;
        match (state, current) {
            (State::Present, None) => self.create(desired),
            (State::Present, Some(current)) => self.update(&current, desired),
            (State::Absent, Some(current)) => self.delete(current),
            (State::Absent, None) => Ok(Outcome {
                changed: false,
                state,
                msg: format!(
                    "The galera hostgroup is already absent from the {TABLE} memory configuration"
                ),
                hostgroup_mapping: None,
                changes: Vec::new(),
            }),
        }
    }

    fn create(&mut self, desired: &HostgroupMapping) -> Result<Outcome, StorageError> {
        let key = desired.writer_hostgroup();
        if self.options.check_mode {
            return Ok(Outcome {
                changed: true,
                state: State::Present,
                msg: format!(
                    "Galera hostgroup would have been added to {TABLE}, however check_mode is enabled."
                ),
                hostgroup_mapping: None,
                changes: Vec::new(),
            });
        }

        table::insert(&mut *self.storage, desired)?;
        if let Some(check_type) = self.options.check_type {
            self.write_optional(key, CheckType::COLUMN, check_type.as_str().into())?;
        }
        let inserted = fetch(&mut *self.storage, key)?;
        self.apply_config()?;

        Ok(Outcome {
            changed: true,
            state: State::Present,
            msg: format!("Added galera hostgroup to {TABLE}"),
            hostgroup_mapping: inserted,
            changes: Vec::new(),
        })
    }

    fn update(
        &mut self,
        current: &HostgroupMapping,
        desired: &HostgroupMapping,
    ) -> Result<Outcome, StorageError> {
        let key = desired.writer_hostgroup();
        let changes: Vec<_> = diff(current, desired)
            .into_iter()
            .filter(|change| change.field != HostgroupMapping::KEY)
            .collect();
        let changed = !changes.is_empty();
        tracing::debug!(key, changes = changes.len(), "diffed galera hostgroup");

        if self.options.check_mode {
            let msg = if changed {
                "Updated galera hostgroup in check_mode"
            } else {
                "Galera hostgroup is already up to date"
            };
            return Ok(Outcome {
                changed,
                state: State::Present,
                msg: msg.to_owned(),
                hostgroup_mapping: Some(current.clone()),
                changes,
            });
        }

        for change in &changes {
            table::update_column(&mut *self.storage, key, change.field, &change.new)?;
        }
        let after = fetch(&mut *self.storage, key)?;
        if changed {
            self.apply_config()?;
        }

        let msg = if changed {
            "Updated galera hostgroup"
        } else {
            "Galera hostgroup is already up to date"
        };
        Ok(Outcome {
            changed,
            state: State::Present,
            msg: msg.to_owned(),
            hostgroup_mapping: after,
            changes,
        })
    }

    fn delete(&mut self, current: HostgroupMapping) -> Result<Outcome, StorageError> {
        if self.options.check_mode {
            return Ok(Outcome {
                changed: true,
                state: State::Absent,
                msg: format!(
                    "Galera hostgroup would have been deleted from {TABLE}, however check_mode is enabled."
                ),
                hostgroup_mapping: Some(current),
                changes: Vec::new(),
            });
        }

        table::delete(&mut *self.storage, current.writer_hostgroup())?;
        self.apply_config()?;

        Ok(Outcome {
            changed: true,
            state: State::Absent,
            msg: format!("Deleted galera hostgroup from {TABLE}"),
            hostgroup_mapping: Some(current),
            changes: Vec::new(),
        })
    }

    fn write_optional(
        &mut self,
        key: u32,
        column: &'static str,
        value: Value,
    ) -> Result<(), StorageError> {
        match table::update_column(&mut *self.storage, key, column, &value) {
            Ok(()) => Ok(()),
            Err(err) if self.options.optional_columns == OptionalColumns::BestEffort => {
                tracing::warn!(key, column, %err, "ignoring failed write of optional column");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn apply_config(&mut self) -> Result<(), StorageError> {
        let category = ConfigCategory::MysqlServers;
        if self.options.save_to_disk {
            self.storage
                .persist(category)
                .map_err(|err| StorageError::new(Operation::Persist(category), err))?;
            tracing::info!(%category, "saved configuration to disk");
        }
        if self.options.load_to_runtime {
            self.storage
                .activate(category)
                .map_err(|err| StorageError::new(Operation::Activate(category), err))?;
            tracing::info!(%category, "loaded configuration to runtime");
        }
        Ok(())
    }
}
