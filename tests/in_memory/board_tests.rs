//! Day-to-day board flows inside one workspace.

use super::helpers::{MemoryApp, app};
use eyre::{OptionExt, Result, ensure};
use rstest::rstest;
use tasklytics::attachment::domain::AttachmentFile;
use tasklytics::entity::Entity;
use tasklytics::task::domain::{NewTask, TaskFilter, TaskPatch, TaskSort, count_by_status};
use tasklytics::taxonomy::domain::RankedDraft;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_moves_across_columns(app: MemoryApp) -> Result<()> {
    let workspace = app.bootstrap().await?;
    let statuses = app.statuses().list(workspace.id()).await;
    let backlog = statuses.first().ok_or_eyre("backlog")?;
    let doing = statuses.get(1).ok_or_eyre("in progress")?;

    let task = app
        .tasks()
        .create(
            NewTask::new("Write release notes").with_status(backlog.id().clone()),
            workspace.id(),
        )
        .await?;
    let moved = app
        .tasks()
        .update(task.id(), TaskPatch::new().with_status(doing.id().clone()))
        .await?;

    ensure!(moved.status_in(&statuses) == Some(doing), "status not resolved");
    ensure!(moved.updated_at() > task.updated_at(), "updatedAt not advanced");
    let counts = count_by_status(&app.tasks().list(workspace.id()).await, &statuses);
    let per_column: Vec<usize> = counts.iter().map(|entry| entry.count).collect();
    ensure!(per_column == [0, 1, 0, 0, 0], "unexpected counts {per_column:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_status_leaves_task_unresolved(app: MemoryApp) -> Result<()> {
    let workspace = app.bootstrap().await?;
    let column = app
        .statuses()
        .create(RankedDraft::new("Review"), workspace.id())
        .await?;
    ensure!(column.order() == 5, "new column not appended");

    let task = app
        .tasks()
        .create(
            NewTask::new("Audit logs").with_status(column.id().clone()),
            workspace.id(),
        )
        .await?;
    app.statuses().delete(column.id()).await?;

    let statuses = app.statuses().list(workspace.id()).await;
    let stored = app.tasks().find(task.id()).await.ok_or_eyre("task kept")?;
    ensure!(stored.status_in(&statuses).is_none(), "dangling status resolved");
    ensure!(stored.status_id() == column.id(), "reference rewritten");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_and_sort_over_the_board(app: MemoryApp) -> Result<()> {
    let workspace = app.bootstrap().await?;
    for title in ["beta report", "Alpha report", "gamma chores"] {
        app.tasks().create(NewTask::new(title), workspace.id()).await?;
    }

    let found = app
        .tasks()
        .query(
            workspace.id(),
            &TaskFilter::new().with_search("REPORT"),
            "title-asc".parse::<TaskSort>()?,
        )
        .await;
    let titles: Vec<&str> = found.iter().map(|task| task.title()).collect();
    ensure!(titles == ["Alpha report", "beta report"], "unexpected {titles:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attachment_travels_with_task(app: MemoryApp) -> Result<()> {
    let workspace = app.bootstrap().await?;
    let file = AttachmentFile::new("notes.txt", "text/plain", b"remember the milk".to_vec());
    let attachment_id = app.attachments().save(&file, workspace.id()).await?;

    let task = app
        .tasks()
        .create(
            NewTask::new("Shopping").with_attachments([attachment_id.clone()]),
            workspace.id(),
        )
        .await?;
    let stored = app.tasks().find(task.id()).await.ok_or_eyre("task")?;
    let first = stored.attachments().first().ok_or_eyre("attachment ref")?;
    let loaded = app.attachments().get(first).await?.ok_or_eyre("file")?;

    ensure!(loaded == file, "file changed in storage");
    ensure!(
        app.attachments().ids_in(workspace.id()).await? == [attachment_id],
        "attachment not scoped to workspace"
    );
    Ok(())
}
