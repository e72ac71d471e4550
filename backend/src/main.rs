//! `user-registry` command-line entry point.
//!
//! Wires the Diesel repository into the application service, runs one
//! command, and prints its result as a single JSON line on stdout. Logs go to
//! stderr as JSON, filtered by `RUST_LOG`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use serde_json::{Value, json};
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_registry::config::RegistrySettings;
use user_registry::domain::ports::{UserIdGenerator, UserRepository, UuidUserIdGenerator};
use user_registry::domain::{UpdateUserCommand, UserApplicationError, UserApplicationService};
use user_registry::outbound::persistence::{DbPool, DieselUserRepository, run_migrations};

/// `user-registry` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "user-registry",
    about = "Register, inspect, rename and remove users",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `USER_REGISTRY_DATABASE_URL`,
    /// then `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    /// Apply pending schema migrations before running the command.
    #[arg(long, global = true)]
    migrate: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Register a new user under NAME.
    Register {
        /// Display name to claim.
        name: String,
    },
    /// Print the user with identifier ID, or `null`.
    Get {
        /// User identifier.
        id: String,
    },
    /// Rename the user with identifier ID.
    Update {
        /// User identifier.
        id: String,
        /// New display name.
        name: String,
    },
    /// Remove the user with identifier ID.
    Delete {
        /// User identifier.
        id: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let args = CliArgs::parse();
    let settings = RegistrySettings::load_from_iter([OsString::from("user-registry")])
        .map_err(|err| eyre!("load settings: {err}"))?;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args, settings))
}

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(args: CliArgs, settings: RegistrySettings) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, &settings)?;

    if args.migrate || settings.run_migrations {
        let url = database_url.clone();
        tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .wrap_err("migration task failed")??;
    }

    let pool = DbPool::new(settings.pool_config(&database_url))
        .await
        .wrap_err("create database pool")?;
    let service = UserApplicationService::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(UuidUserIdGenerator),
    );

    let output = execute(&service, args.command).await.map_err(|err| {
        error!(code = err.code().as_str(), error = %err, "command failed");
        Report::new(err)
    })?;
    println!("{output}");
    Ok(())
}

/// Run `command` and render its result as JSON.
async fn execute<R, G>(
    service: &UserApplicationService<R, G>,
    command: Command,
) -> Result<Value, UserApplicationError>
where
    R: UserRepository,
    G: UserIdGenerator,
{
    match command {
        Command::Register { name } => service.register(&name).await.map(|user| json!(user)),
        Command::Get { id } => service.get(&id).await.map(|user| json!(user)),
        Command::Update { id, name } => service
            .update(UpdateUserCommand::new(id.as_str(), name.as_str()))
            .await
            .map(|()| json!({ "id": id, "name": name })),
        Command::Delete { id } => service
            .delete(&id)
            .await
            .map(|()| json!({ "deleted": id })),
    }
}

fn resolve_database_url(explicit: Option<String>, settings: &RegistrySettings) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }

    settings.database_url().ok_or_else(|| {
        eyre!("database URL missing: set --database-url, USER_REGISTRY_DATABASE_URL or DATABASE_URL")
    })
}
