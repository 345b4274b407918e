//! Maintenance commands for a Tasklytics database.
//!
//! Usage:
//!
//! ```text
//! tasklytics export [<path>]
//! tasklytics import <path> [--workspace <id>]
//! tasklytics workspaces
//! tasklytics wipe --confirm DELETE
//! ```
//!
//! The database is chosen with `TASKLYTICS_DATABASE` (a file path, or
//! `:memory:`). When an export cannot be written, the JSON is printed to
//! stdout so it can be saved by hand.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use mockable::Clock;
use std::io::{self, Write};
use tasklytics::{
    ConfigError, Tasklytics, TasklyticsConfig,
    entity::{Entity, ServiceError, WorkspaceId},
    storage::{
        domain::{Snapshot, StorageError},
        ports::ObjectStore,
    },
    telemetry,
};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::warn;

/// File written by `export` when no path is given.
const DEFAULT_EXPORT_FILE: &str = "Tasklytics_backup.json";
/// Word `wipe` must be confirmed with.
const WIPE_CONFIRMATION: &str = "DELETE";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to read '{path}': {source}")]
    ReadFile {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Export {
        path: Utf8PathBuf,
    },
    Import {
        path: Utf8PathBuf,
        workspace: Option<WorkspaceId>,
    },
    Workspaces,
    Wipe,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let name = args
            .next()
            .ok_or_else(|| CliError::InvalidArgs("missing command".into()))?;
        let command = match name.as_str() {
            "export" => Self::Export {
                path: args
                    .next()
                    .map_or_else(|| Utf8PathBuf::from(DEFAULT_EXPORT_FILE), Utf8PathBuf::from),
            },
            "import" => Self::parse_import(&mut args)?,
            "workspaces" => Self::Workspaces,
            "wipe" => Self::parse_wipe(&mut args)?,
            other => {
                return Err(CliError::InvalidArgs(format!(
                    "unknown command '{other}'; expected export, import, workspaces, or wipe"
                )));
            }
        };
        if let Some(extra) = args.next() {
            return Err(CliError::InvalidArgs(format!(
                "unexpected extra argument: {extra}"
            )));
        }
        Ok(command)
    }

    fn parse_import(args: &mut impl Iterator<Item = String>) -> Result<Self, CliError> {
        let path = args
            .next()
            .map(Utf8PathBuf::from)
            .ok_or_else(|| CliError::InvalidArgs("import needs a snapshot path".into()))?;
        let workspace = match args.next().as_deref() {
            None => None,
            Some("--workspace") => Some(args.next().map(WorkspaceId::from).ok_or_else(|| {
                CliError::InvalidArgs("--workspace needs a workspace id".into())
            })?),
            Some(other) => {
                return Err(CliError::InvalidArgs(format!(
                    "unexpected import option '{other}'"
                )));
            }
        };
        Ok(Self::Import { path, workspace })
    }

    fn parse_wipe(args: &mut impl Iterator<Item = String>) -> Result<Self, CliError> {
        let flag = args.next();
        let word = args.next();
        if flag.as_deref() == Some("--confirm") && word.as_deref() == Some(WIPE_CONFIRMATION) {
            Ok(Self::Wipe)
        } else {
            Err(CliError::InvalidArgs(format!(
                "wipe deletes every record; confirm with 'wipe --confirm {WIPE_CONFIRMATION}'"
            )))
        }
    }
}

fn main() -> Result<(), BoxError> {
    telemetry::init_tracing()?;
    let command = Command::parse(collect_args()?.into_iter())?;
    let config = TasklyticsConfig::from_env().map_err(CliError::from)?;
    let runtime = build_runtime()?;
    let app = Tasklytics::from_config(&config);
    let mut stdout = io::stdout().lock();
    runtime.block_on(run(&app, command, &mut stdout))?;
    Ok(())
}

fn collect_args() -> Result<Vec<String>, CliError> {
    std::env::args_os()
        .skip(1)
        .map(|arg_os| {
            arg_os
                .into_string()
                .map_err(|_| CliError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)
}

async fn run<S, C>(
    app: &Tasklytics<S, C>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    match command {
        Command::Export { path } => export(app, &path, out).await,
        Command::Import { path, workspace } => import(app, &path, workspace, out).await,
        Command::Workspaces => list_workspaces(app, out).await,
        Command::Wipe => {
            app.engine().clear_all_stores().await?;
            writeln!(out, "all data deleted").map_err(CliError::Output)
        }
    }
}

async fn export<S, C>(
    app: &Tasklytics<S, C>,
    path: &Utf8Path,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    let json = app.engine().export_data().await?.to_json_pretty()?;
    if let Err(err) = write_file(path, &json) {
        warn!(%path, error = %err, "could not write export; printing it instead");
        return writeln!(out, "{json}").map_err(CliError::Output);
    }
    writeln!(out, "exported to {path}").map_err(CliError::Output)
}

async fn import<S, C>(
    app: &Tasklytics<S, C>,
    path: &Utf8Path,
    workspace: Option<WorkspaceId>,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    let text = read_file(path).map_err(|source| CliError::ReadFile {
        path: path.to_owned(),
        source,
    })?;
    let snapshot = Snapshot::from_json(&text)?;
    let target = import_target(app, workspace).await?;
    let summary = app.engine().import_data(snapshot, target.as_str()).await?;
    writeln!(
        out,
        "imported {} records into workspace {target} (replaced {})",
        summary.total_imported(),
        summary.removed()
    )
    .map_err(CliError::Output)
}

async fn import_target<S, C>(
    app: &Tasklytics<S, C>,
    requested: Option<WorkspaceId>,
) -> Result<WorkspaceId, CliError>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    let Some(id) = requested else {
        return Ok(app.bootstrap().await?.id().clone());
    };
    let workspace = app
        .workspaces()
        .find(&id)
        .await
        .ok_or_else(|| ServiceError::not_found("workspace", id.as_str()))?;
    Ok(workspace.id().clone())
}

async fn list_workspaces<S, C>(app: &Tasklytics<S, C>, out: &mut impl Write) -> Result<(), CliError>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    let current = app.bootstrap().await?;
    for workspace in app.workspaces().list().await {
        let marker = if workspace.id() == current.id() { '*' } else { ' ' };
        writeln!(out, "{marker} {}\t{}", workspace.id(), workspace.name())
            .map_err(CliError::Output)?;
    }
    Ok(())
}

fn ambient_dir_and_file(path: &Utf8Path) -> io::Result<(Dir, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

fn write_file(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let (dir, file_name) = ambient_dir_and_file(path)?;
    dir.write(file_name, contents)
}

fn read_file(path: &Utf8Path) -> io::Result<String> {
    let (dir, file_name) = ambient_dir_and_file(path)?;
    dir.read_to_string(file_name)
}
