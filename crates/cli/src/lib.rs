//! galera-hostgroups CLI -- converge a ProxySQL Galera hostgroup to a desired state.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use galera_hostgroups_core::{CheckType, OptionalColumns, Options, RawMapping, State};
use galera_hostgroups_drivers::{AdminConfig, ClientOptions, OptionFileError};

#[derive(Debug, Parser)]
#[command(
    name = "galera-hostgroups",
    about = "Manage ProxySQL Galera hostgroups declaratively"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, update or delete a galera hostgroup
    Apply(ApplyArgs),
    /// Print the stored galera hostgroup for a writer hostgroup
    Show(ShowArgs),
}

/// Login settings. Each one not given here or in the environment is taken
/// from `--config-file`, then from the ProxySQL defaults.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Admin interface host [default: 127.0.0.1]
    #[arg(long, env = "PROXYSQL_LOGIN_HOST")]
    pub login_host: Option<String>,
    /// Admin interface port [default: 6032]
    #[arg(long, env = "PROXYSQL_LOGIN_PORT")]
    pub login_port: Option<u16>,
    /// [default: admin]
    #[arg(long, env = "PROXYSQL_LOGIN_USER")]
    pub login_user: Option<String>,
    #[arg(long, env = "PROXYSQL_LOGIN_PASSWORD", hide_env_values = true)]
    pub login_password: Option<String>,
    /// Connect through this unix socket instead of host and port
    #[arg(long, env = "PROXYSQL_LOGIN_UNIX_SOCKET")]
    pub login_unix_socket: Option<PathBuf>,
    /// MySQL option file whose [client] group supplies missing login settings
    #[arg(long, env = "PROXYSQL_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
    /// Seconds to wait for the connection
    #[arg(long, default_value_t = 10)]
    pub connect_timeout: u64,
}

impl LoginArgs {
    /// Resolve the connection settings.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionFileError`] if `--config-file` cannot be read.
    pub fn admin_config(&self) -> Result<AdminConfig, OptionFileError> {
        let file = match &self.config_file {
            Some(path) => ClientOptions::load(path)?,
            None => ClientOptions::default(),
        };
        let defaults = AdminConfig::default();
        Ok(AdminConfig {
            host: self.login_host.clone().or(file.host).unwrap_or(defaults.host),
            port: self.login_port.or(file.port).unwrap_or(defaults.port),
            user: self.login_user.clone().or(file.user).unwrap_or(defaults.user),
            password: self
                .login_password
                .clone()
                .or(file.password)
                .unwrap_or(defaults.password),
            socket: self.login_unix_socket.clone().or(file.socket),
            connect_timeout: Duration::from_secs(self.connect_timeout),
        })
    }
}

#[derive(Debug, Parser)]
#[command(allow_negative_numbers = true)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub login: LoginArgs,
    /// Writer hostgroup id, identifying the mapping
    #[arg(long)]
    pub writer_hostgroup: i64,
    #[arg(long)]
    pub backup_writer_hostgroup: i64,
    #[arg(long)]
    pub reader_hostgroup: i64,
    #[arg(long)]
    pub offline_hostgroup: i64,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub active: bool,
    #[arg(long, default_value_t = 1)]
    pub max_writers: i64,
    /// 0: never, 1: always, 2: only backup writers
    #[arg(long, default_value_t = 0)]
    pub writer_is_also_reader: i64,
    #[arg(long, default_value_t = 0)]
    pub max_transactions_behind: i64,
    #[arg(long, default_value = "")]
    pub comment: String,
    /// Monitor check type, written after creation where the server supports it
    #[arg(long)]
    pub check_type: Option<CheckTypeArg>,
    /// What to do when the server lacks an optional column
    #[arg(long, default_value = "best-effort")]
    pub optional_columns: OptionalColumnsArg,
    #[arg(long, default_value = "present")]
    pub state: StateArg,
    /// Save MYSQL SERVERS to disk after a change
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub save_to_disk: bool,
    /// Load MYSQL SERVERS to runtime after a change
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub load_to_runtime: bool,
    /// Report what would change without changing anything
    #[arg(long)]
    pub check: bool,
}

impl ApplyArgs {
    #[must_use]
    pub fn raw_mapping(&self) -> RawMapping {
        RawMapping {
            writer_hostgroup: self.writer_hostgroup,
            backup_writer_hostgroup: self.backup_writer_hostgroup,
            reader_hostgroup: self.reader_hostgroup,
            offline_hostgroup: self.offline_hostgroup,
            active: self.active.into(),
            max_writers: self.max_writers,
            writer_is_also_reader: self.writer_is_also_reader,
            max_transactions_behind: self.max_transactions_behind,
            comment: self.comment.clone(),
        }
    }

    #[must_use]
    pub fn options(&self) -> Options {
        Options {
            check_mode: self.check,
            save_to_disk: self.save_to_disk,
            load_to_runtime: self.load_to_runtime,
            check_type: self.check_type.clone().map(CheckType::from),
            optional_columns: self.optional_columns.clone().into(),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    pub login: LoginArgs,
    #[arg(long)]
    pub writer_hostgroup: u32,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum StateArg {
    Present,
    Absent,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CheckTypeArg {
    #[value(name = "read_only")]
    ReadOnly,
    #[value(name = "innodb_read_only")]
    InnodbReadOnly,
    #[value(name = "super_read_only")]
    SuperReadOnly,
    #[value(name = "read_only|innodb_read_only")]
    ReadOnlyOrInnodbReadOnly,
    #[value(name = "read_only&innodb_read_only")]
    ReadOnlyAndInnodbReadOnly,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OptionalColumnsArg {
    BestEffort,
    Required,
}

impl From<StateArg> for State {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Present => Self::Present,
            StateArg::Absent => Self::Absent,
        }
    }
}

impl From<CheckTypeArg> for CheckType {
    fn from(check_type: CheckTypeArg) -> Self {
        match check_type {
            CheckTypeArg::ReadOnly => Self::ReadOnly,
            CheckTypeArg::InnodbReadOnly => Self::InnodbReadOnly,
            CheckTypeArg::SuperReadOnly => Self::SuperReadOnly,
            CheckTypeArg::ReadOnlyOrInnodbReadOnly => Self::ReadOnlyOrInnodbReadOnly,
            CheckTypeArg::ReadOnlyAndInnodbReadOnly => Self::ReadOnlyAndInnodbReadOnly,
        }
    }
}

impl From<OptionalColumnsArg> for OptionalColumns {
    fn from(policy: OptionalColumnsArg) -> Self {
        match policy {
            OptionalColumnsArg::BestEffort => Self::BestEffort,
            OptionalColumnsArg::Required => Self::Required,
        }
    }
}
