use core::fmt::{Display, Formatter, Result};

use crate::record::{Row, Value};

/// Configuration category that the admin interface saves and loads as a unit.
///
/// Galera hostgroups belong to the `MYSQL SERVERS` category, together with
/// `mysql_servers` and the other hostgroup tables.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfigCategory {
    MysqlServers,
}

impl ConfigCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MysqlServers => "MYSQL SERVERS",
        }
    }
}

impl Display for ConfigCategory {
    fn fmt(&self, f: &mut Formatter) -> Result {
        f.write_str(self.as_str())
    }
}

/// A handle to the admin database, owned by the caller.
///
/// Statements use `?` placeholders, bound positionally from `params`.
pub trait Storage {
    /// The error type returned by this storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run a statement that returns rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be executed.
    fn query(&mut self, sql: &str, params: &[Value]) -> core::result::Result<Vec<Row>, Self::Error>;

    /// Run a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be executed.
    fn execute(&mut self, sql: &str, params: &[Value]) -> core::result::Result<(), Self::Error>;

    /// Durably write the in-memory state of `category` to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin interface refuses the command.
    fn persist(&mut self, category: ConfigCategory) -> core::result::Result<(), Self::Error>;

    /// Make the in-memory state of `category` effective for live traffic.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin interface refuses the command.
    fn activate(&mut self, category: ConfigCategory) -> core::result::Result<(), Self::Error>;
}
