//! Opening database files written by other builds.

use super::helpers::{TempDatabase, database};
use eyre::{OptionExt, Result, ensure};
use rstest::rstest;
use serde_json::json;
use tasklytics::entity::{Entity, TaskId};
use tasklytics::storage::{
    domain::{Record, SettingKey, StorageError, StoreName},
    ports::{ObjectStore, TransactionMode},
    services::{SCHEMA_VERSION, StorageEngine},
};

async fn write_version_three(db: &TempDatabase) -> Result<()> {
    db.store()
        .transact(TransactionMode::ReadWrite, |tx| {
            for store in [
                StoreName::Tasks,
                StoreName::Statuses,
                StoreName::Tags,
                StoreName::Priorities,
                StoreName::Settings,
                StoreName::Attachments,
                StoreName::Workspaces,
            ] {
                tx.create_store(store)?;
            }
            tx.set_schema_version(3)?;
            tx.add(
                StoreName::Tasks,
                Record::from_value(json!({
                    "id": "legacy-task",
                    "title": "Written before workspaces",
                    "statusId": "",
                    "createdAt": "2023-11-02T08:00:00Z",
                    "updatedAt": "2023-11-02T08:00:00Z"
                }))?,
            )?;
            tx.put(
                StoreName::Settings,
                Record::setting(SettingKey::LegacyAppName.to_string(), json!("Old Board")),
            )
        })
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_rows_move_into_backfilled_workspace(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    write_version_three(&db).await?;

    let app = db.open();
    let workspace = app.bootstrap().await?;

    ensure!(workspace.name() == "Old Board", "legacy name not used");
    ensure!(app.workspaces().list().await.len() == 1, "extra workspace");
    let task = app
        .tasks()
        .find(&TaskId::from_string("legacy-task"))
        .await
        .ok_or_eyre("legacy task lost")?;
    let listed = app.tasks().list(workspace.id()).await;
    ensure!(
        listed.iter().any(|candidate| candidate.id() == task.id()),
        "legacy task not scoped to the workspace"
    );
    ensure!(
        app.settings().app_name(workspace.id()).await.as_deref() == Some("Old Board"),
        "app name not moved to the workspace key"
    );
    let legacy = app
        .engine()
        .get(StoreName::Settings, &SettingKey::LegacyAppName.to_string())
        .await?;
    ensure!(legacy.is_none(), "unscoped app name kept");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn newer_database_is_refused(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    db.store()
        .transact(TransactionMode::ReadWrite, |tx| {
            tx.set_schema_version(SCHEMA_VERSION + 1)
        })
        .await?;

    let result = StorageEngine::new(db.store()).init().await;
    ensure!(
        matches!(
            result,
            Err(StorageError::VersionTooNew { found, supported })
                if found == SCHEMA_VERSION + 1 && supported == SCHEMA_VERSION
        ),
        "expected VersionTooNew, got {result:?}"
    );
    Ok(())
}
