//! Data written by one process is visible to the next.

use super::helpers::{TempDatabase, database};
use eyre::{OptionExt, Result, ensure};
use rstest::rstest;
use tasklytics::attachment::domain::AttachmentFile;
use tasklytics::entity::Entity;
use tasklytics::storage::services::SCHEMA_VERSION;
use tasklytics::task::domain::{NewTask, TaskPatch};
use tasklytics::taxonomy::domain::RankedDraft;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_survives_reopen(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    let (workspace_id, task_id) = {
        let first = db.open();
        let workspace = first.bootstrap().await?;
        let task = first
            .tasks()
            .create(
                NewTask::new("Persist me").with_deadline("2024-06-01"),
                workspace.id(),
            )
            .await?;
        first
            .tasks()
            .update(task.id(), TaskPatch::new().with_description("**bold**"))
            .await?;
        (workspace.id().clone(), task.id().clone())
    };

    let second = db.open();
    let reopened = second.bootstrap().await?;
    ensure!(reopened.id() == &workspace_id, "a new workspace was created");
    let task = second.tasks().find(&task_id).await.ok_or_eyre("task lost")?;
    ensure!(task.description() == "**bold**", "update lost");
    ensure!(task.deadline() == Some("2024-06-01"), "deadline rewritten");
    ensure!(second.statuses().list(&workspace_id).await.len() == 5, "reseeded");
    ensure!(second.tags().list().await.len() == 3, "tags reseeded");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopen_keeps_schema_version(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    db.open().bootstrap().await?;

    let version = db.open().engine().init().await?;
    ensure!(version == SCHEMA_VERSION, "unexpected version {version}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_persists(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    let app = db.open();
    let workspace = app.bootstrap().await?;
    let review = app
        .statuses()
        .create(RankedDraft::new("Review"), workspace.id())
        .await?;
    let mut ids: Vec<_> = app
        .statuses()
        .list(workspace.id())
        .await
        .iter()
        .map(|status| status.id().clone())
        .filter(|id| id != review.id())
        .collect();
    ids.insert(0, review.id().clone());
    let updated = app.statuses().update_order(ids).await?;
    ensure!(updated == 6, "updated {updated}");

    let names: Vec<String> = db
        .open()
        .statuses()
        .list(workspace.id())
        .await
        .iter()
        .map(|status| status.name().to_owned())
        .collect();
    ensure!(
        names.first().map(String::as_str) == Some("Review"),
        "unexpected order {names:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attachment_bytes_survive_reopen(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    let app = db.open();
    let workspace = app.bootstrap().await?;
    let bytes: Vec<u8> = (0_u8..=255).collect();
    let file = AttachmentFile::new("blob.bin", "", bytes);
    let id = app.attachments().save(&file, workspace.id()).await?;

    let loaded = db
        .open()
        .attachments()
        .get(&id)
        .await?
        .ok_or_eyre("attachment lost")?;
    ensure!(loaded.bytes() == file.bytes(), "bytes changed");
    ensure!(
        loaded.media_type() == "application/octet-stream",
        "unexpected type {}",
        loaded.media_type()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workspace_delete_is_durable(database: Result<TempDatabase>) -> Result<()> {
    let db = database?;
    let app = db.open();
    let workspace = app.bootstrap().await?;
    app.tasks()
        .create(NewTask::new("Doomed"), workspace.id())
        .await?;
    let summary = app.workspaces().delete(workspace.id()).await?;
    ensure!(summary.total() == 11, "unexpected total {}", summary.total());

    let reopened = db.open();
    ensure!(reopened.workspaces().list().await.is_empty(), "workspace kept");
    ensure!(reopened.tasks().list(workspace.id()).await.is_empty(), "task kept");
    ensure!(reopened.settings().current_workspace().await.is_none(), "pointer kept");
    Ok(())
}
