use std::process;

use clap::Parser;
use galera_hostgroups_cli::{App, ApplyArgs, Command, LoginArgs, ShowArgs};
use galera_hostgroups_core::error::{Operation, StorageError};
use galera_hostgroups_core::{fetch, validate, Error, HostgroupMapping, Reconciler};
use galera_hostgroups_drivers::AdminConnection;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    let app = App::parse();

    let default_level = if app.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match &app.command {
        Command::Apply(args) => apply(args),
        Command::Show(args) => show(args),
    };
    if let Err(err) = result {
        fail(&err);
    }
}

fn connect(login: &LoginArgs) -> Result<AdminConnection, Error> {
    let config = login
        .admin_config()
        .map_err(|e| StorageError::new(Operation::Connect, e))?;
    AdminConnection::connect(&config)
        .map_err(|e| StorageError::new(Operation::Connect, e).into())
}

fn disconnect(admin: AdminConnection) {
    if let Err(e) = admin.close() {
        tracing::warn!(error = %e, "failed to close admin connection");
    }
}

fn apply(args: &ApplyArgs) -> Result<(), Error> {
    // nothing is sent to the server for invalid input
    let desired = validate(&args.raw_mapping())?;

    let mut admin = connect(&args.login)?;
    let outcome =
        Reconciler::new(&mut admin, args.options()).converge(&desired, args.state.clone().into());
    disconnect(admin);

    emit(&outcome?);
    Ok(())
}

#[derive(Serialize)]
struct Lookup {
    changed: bool,
    writer_hostgroup: u32,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostgroup_mapping: Option<HostgroupMapping>,
}

fn show(args: &ShowArgs) -> Result<(), Error> {
    let mut admin = connect(&args.login)?;
    let current = fetch(&mut admin, args.writer_hostgroup);
    disconnect(admin);

    let current = current?;
    emit(&Lookup {
        changed: false,
        writer_hostgroup: args.writer_hostgroup,
        exists: current.is_some(),
        hostgroup_mapping: current,
    });
    Ok(())
}

fn emit(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            process::exit(1);
        }
    }
}

fn fail(err: &Error) -> ! {
    tracing::error!(error = %err, "galera hostgroup run failed");
    println!(
        "{}",
        serde_json::json!({ "changed": false, "failed": true, "msg": err.to_string() })
    );
    process::exit(1);
}
