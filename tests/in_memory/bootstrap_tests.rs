//! First-start behaviour of the facade.

use super::helpers::{MemoryApp, app};
use eyre::{OptionExt, Result, ensure};
use rstest::rstest;
use tasklytics::entity::{Entity, ServiceError, WorkspaceId, WorkspaceScoped};
use tasklytics::storage::domain::StoreName;
use tasklytics::workspace::domain::{DEFAULT_WORKSPACE_NAME, NewWorkspace};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_creates_and_seeds_default_workspace(app: MemoryApp) -> Result<()> {
    let workspace = app.bootstrap().await?;

    ensure!(workspace.name() == DEFAULT_WORKSPACE_NAME, "unexpected name");
    ensure!(
        app.settings().current_workspace().await.as_ref() == Some(workspace.id()),
        "current workspace not remembered"
    );
    let names: Vec<String> = app
        .statuses()
        .list(workspace.id())
        .await
        .iter()
        .map(|status| status.name().to_owned())
        .collect();
    ensure!(
        names == ["Backlog", "In Progress", "Completed", "Blocked", "Cancelled"],
        "unexpected statuses {names:?}"
    );
    ensure!(app.priorities().list(workspace.id()).await.len() == 3, "priorities");
    ensure!(app.tags().list().await.len() == 3, "tags");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_bootstrap_reuses_workspace_and_seeds(app: MemoryApp) -> Result<()> {
    let first = app.bootstrap().await?;
    let second = app.clone().bootstrap().await?;

    ensure!(first.id() == second.id(), "workspace changed between starts");
    ensure!(app.workspaces().list().await.len() == 1, "extra workspace");
    ensure!(app.statuses().list(first.id()).await.len() == 5, "statuses doubled");
    ensure!(app.tags().list().await.len() == 3, "tags doubled");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_bootstraps_seed_once(app: MemoryApp) -> Result<()> {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = app.clone();
            tokio::spawn(async move { shared.bootstrap().await })
        })
        .collect();
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??.id().clone());
    }
    ids.dedup();

    let workspace = ids.first().ok_or_eyre("no workspace")?;
    ensure!(ids.len() == 1, "bootstraps disagreed on the workspace");
    ensure!(app.statuses().list(workspace).await.len() == 5, "statuses");
    ensure!(app.priorities().list(workspace).await.len() == 3, "priorities");
    ensure!(app.tags().list().await.len() == 3, "tags");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_workspace_gets_its_own_defaults(app: MemoryApp) -> Result<()> {
    let home = app.bootstrap().await?;
    let side = app
        .create_workspace(NewWorkspace::new().with_name("Side project"))
        .await?;

    ensure!(app.statuses().list(side.id()).await.len() == 5, "side statuses");
    ensure!(
        app.statuses()
            .list(side.id())
            .await
            .iter()
            .all(|status| status.workspace_id() == side.id()),
        "status leaked across workspaces"
    );
    ensure!(app.statuses().list(home.id()).await.len() == 5, "home statuses");
    ensure!(app.tags().list().await.len() == 3, "tags are shared");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn switching_workspace_is_remembered(app: MemoryApp) -> Result<()> {
    app.bootstrap().await?;
    let side = app
        .create_workspace(NewWorkspace::new().with_name("Side project"))
        .await?;

    let opened = app.switch_workspace(side.id()).await?;
    ensure!(opened.id() == side.id(), "switched to the wrong workspace");

    let reopened = app.bootstrap().await?;
    ensure!(reopened.id() == side.id(), "bootstrap ignored the stored choice");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn switching_to_unknown_workspace_fails(app: MemoryApp) -> Result<()> {
    let home = app.bootstrap().await?;

    let result = app
        .switch_workspace(&WorkspaceId::from_string("missing"))
        .await;
    ensure!(
        matches!(result, Err(ServiceError::NotFound { kind: "workspace", .. })),
        "expected NotFound, got {result:?}"
    );
    ensure!(
        app.settings().current_workspace().await.as_ref() == Some(home.id()),
        "current workspace changed"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_current_workspace_falls_back_on_next_start(app: MemoryApp) -> Result<()> {
    let home = app.bootstrap().await?;
    let side = app
        .create_workspace(NewWorkspace::new().with_name("Side project"))
        .await?;
    app.switch_workspace(side.id()).await?;

    let summary = app.workspaces().delete(side.id()).await?;
    ensure!(summary.workspace_removed(), "workspace record kept");
    ensure!(summary.removed(StoreName::Statuses) == 5, "statuses kept");
    ensure!(
        app.settings().current_workspace().await.is_none(),
        "current pointer left dangling"
    );

    let reopened = app.bootstrap().await?;
    ensure!(reopened.id() == home.id(), "did not fall back to the remaining workspace");
    Ok(())
}
