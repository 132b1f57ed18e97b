//! Login settings from a MySQL option file (`~/.my.cnf` style).
//!
//! Only the `[client]` group is read, and only the keys the admin
//! connection uses: `host`, `port`, `user`, `password` and `socket`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};

#[derive(Debug, thiserror::Error)]
pub enum OptionFileError {
    #[error("unable to read option file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("invalid port {value} in option file {}", path.display())]
    Port { path: PathBuf, value: i64 },
}

/// The `[client]` group of an option file. Absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub socket: Option<PathBuf>,
}

fn lookup<T>(
    result: Result<T, ConfigError>,
) -> Result<Option<T>, ConfigError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

impl ClientOptions {
    /// Read the `[client]` group of the option file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionFileError`] if the file is missing, is not valid
    /// INI, or carries a port outside `u16`.
    pub fn load(path: &Path) -> Result<Self, OptionFileError> {
        let read_err = |source| OptionFileError::Read {
            path: path.to_owned(),
            source,
        };

        let config = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Ini).required(true))
            .build()
            .map_err(read_err)?;

        let port = lookup(config.get_int("client.port"))
            .map_err(read_err)?
            .map(|value| {
                u16::try_from(value).map_err(|_| OptionFileError::Port {
                    path: path.to_owned(),
                    value,
                })
            })
            .transpose()?;

        let options = Self {
            host: lookup(config.get_string("client.host")).map_err(read_err)?,
            port,
            user: lookup(config.get_string("client.user")).map_err(read_err)?,
            password: lookup(config.get_string("client.password")).map_err(read_err)?,
            socket: lookup(config.get_string("client.socket"))
                .map_err(read_err)?
                .map(PathBuf::from),
        };
        tracing::debug!(
            path = %path.display(),
            user = ?options.user,
            host = ?options.host,
            "read client option file"
        );
        Ok(options)
    }
}
