//! Storage drivers for `galera_hostgroups_core`.
//!
//! [`AdminConnection`] talks to a running ProxySQL admin interface over the
//! MySQL protocol and implements [`Storage`](galera_hostgroups_core::Storage).
//! [`ClientOptions`] reads login settings from a MySQL option file.

use std::path::PathBuf;
use std::time::Duration;

mod literal;
mod option_file;
pub mod proxysql;

pub use literal::{render, RenderError};
pub use option_file::{ClientOptions, OptionFileError};
pub use proxysql::{AdminConnection, AdminError};

/// Configuration for connecting to the ProxySQL admin interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Hostname or IP address of the admin interface.
    pub host: String,
    /// Port of the admin interface.
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Unix socket to connect through instead of `host`/`port`.
    pub socket: Option<PathBuf>,
    pub connect_timeout: Duration,
}

impl Default for AdminConfig {
    /// The credentials and address ProxySQL ships with.
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 6032,
            user: "admin".to_owned(),
            password: "admin".to_owned(),
            socket: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}
