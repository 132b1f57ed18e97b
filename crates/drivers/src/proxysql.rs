//! Driver for the ProxySQL admin interface (MySQL protocol, default port 6032).

use std::time::Duration;

use galera_hostgroups_core::{ConfigCategory, Row, Storage, Value};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row as _};
use tokio::runtime::{Builder, Runtime};

use crate::literal::{render, RenderError};
use crate::AdminConfig;

/// Errors from the admin interface driver.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The runtime driving the connection could not be started.
    #[error("failed to start I/O runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("timed out after {0:?} while connecting")]
    Timeout(Duration),
    /// Failure reported by the server or the connection.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A single blocking connection to the ProxySQL admin interface.
///
/// Statements are sent over the text protocol with their parameters inlined,
/// since the admin interface does not implement server-side prepared
/// statements.
pub struct AdminConnection {
    runtime: Runtime,
    conn: MySqlConnection,
}

impl AdminConnection {
    /// Connect to the admin interface described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established within
    /// `config.connect_timeout`.
    pub fn connect(config: &AdminConfig) -> Result<Self, AdminError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AdminError::Runtime)?;

        // keep session setup to plain SET NAMES, which the admin interface accepts
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .pipes_as_concat(false)
            .no_engine_substitution(false)
            .timezone(None::<String>)
            .statement_cache_capacity(0);
        if let Some(socket) = &config.socket {
            options = options.socket(socket);
        }

        tracing::debug!(
            host = %config.host,
            port = config.port,
            user = %config.user,
            socket = ?config.socket,
            "connecting to ProxySQL admin interface"
        );
        let timeout = config.connect_timeout;
        let conn = runtime
            .block_on(async { tokio::time::timeout(timeout, options.connect()).await })
            .map_err(|_| AdminError::Timeout(timeout))??;

        Ok(Self { runtime, conn })
    }

    /// Close the connection gracefully.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not acknowledge the close.
    pub fn close(self) -> Result<(), AdminError> {
        let Self { runtime, conn } = self;
        runtime.block_on(conn.close())?;
        Ok(())
    }

    fn run(&mut self, sql: &str) -> Result<(), AdminError> {
        tracing::debug!(%sql, "admin statement");
        self.runtime.block_on(self.conn.execute(sql))?;
        Ok(())
    }
}

fn decode(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    row.columns()
        .iter()
        .map(|column| -> Result<(String, Value), sqlx::Error> {
            let index = column.ordinal();
            let value = match row.try_get::<Option<i64>, _>(index) {
                Ok(value) => value.map(Value::Int),
                Err(_) => row
                    .try_get_unchecked::<Option<String>, _>(index)?
                    .map(Value::Text),
            };
            Ok((column.name().to_owned(), value.unwrap_or(Value::Null)))
        })
        .collect()
}

impl Storage for AdminConnection {
    type Error = AdminError;

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Self::Error> {
        let sql = render(sql, params)?;
        tracing::debug!(%sql, "admin query");
        let rows = self.runtime.block_on(self.conn.fetch_all(sql.as_str()))?;
        Ok(rows.iter().map(decode).collect::<Result<_, _>>()?)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<(), Self::Error> {
        let sql = render(sql, params)?;
        self.run(&sql)
    }

    fn persist(&mut self, category: ConfigCategory) -> Result<(), Self::Error> {
        self.run(&format!("SAVE {category} TO DISK"))
    }

    fn activate(&mut self, category: ConfigCategory) -> Result<(), Self::Error> {
        self.run(&format!("LOAD {category} TO RUNTIME"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6032);
        assert_eq!(config.user, "admin");
        assert!(config.socket.is_none());
    }

    #[test]
    fn test_connect_refused() {
        let config = AdminConfig {
            port: 1,
            connect_timeout: Duration::from_secs(2),
            ..AdminConfig::default()
        };
        assert!(AdminConnection::connect(&config).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = AdminError::Timeout(Duration::from_secs(3));
        assert_eq!(err.to_string(), "timed out after 3s while connecting");
        let err = AdminError::from(RenderError::MissingParameter { given: 0 });
        assert_eq!(
            err.to_string(),
            "statement has more placeholders than the 0 given parameters"
        );
    }
}
