//! Backup export and restore through the facade.

use super::helpers::{MemoryApp, app};
use eyre::{OptionExt, Result, ensure};
use rstest::rstest;
use tasklytics::entity::{Entity, WorkspaceScoped};
use tasklytics::settings::Language;
use tasklytics::storage::domain::{Snapshot, StorageError, StoreName};
use tasklytics::task::domain::NewTask;
use tasklytics::workspace::domain::NewWorkspace;

async fn populated(app: &MemoryApp) -> Result<Snapshot> {
    let workspace = app.bootstrap().await?;
    app.settings().set_app_name(workspace.id(), "Home board").await?;
    app.settings().set_language(Language::De).await?;
    for title in ["Plan sprint", "Review PR"] {
        app.tasks().create(NewTask::new(title), workspace.id()).await?;
    }
    let json = app.engine().export_data().await?.to_json_pretty()?;
    Ok(Snapshot::from_json(&json)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backup_restores_into_another_database(app: MemoryApp) -> Result<()> {
    let snapshot = populated(&app).await?;
    let restored = super::helpers::app();
    let target = restored.bootstrap().await?;

    let summary = restored
        .engine()
        .import_data(snapshot, target.id().as_str())
        .await?;

    ensure!(summary.removed() == 8, "seeded entries not replaced");
    ensure!(summary.imported(StoreName::Tasks) == 2, "tasks");
    let tasks = restored.tasks().list(target.id()).await;
    ensure!(tasks.len() == 2, "tasks not visible in target");
    ensure!(
        tasks.iter().all(|task| task.workspace_id() == target.id()),
        "task kept its source workspace"
    );
    ensure!(
        restored.settings().app_name(target.id()).await.as_deref() == Some("Home board"),
        "app name not restored"
    );
    ensure!(restored.settings().language().await == Language::De, "language");
    let renamed = restored
        .workspaces()
        .find(target.id())
        .await
        .ok_or_eyre("target workspace")?;
    ensure!(renamed.name() == "Home board", "workspace name not restored");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backup_restores_over_its_own_workspace(app: MemoryApp) -> Result<()> {
    let snapshot = populated(&app).await?;
    let workspace = app.bootstrap().await?;
    app.tasks()
        .create(NewTask::new("Written after backup"), workspace.id())
        .await?;

    app.engine()
        .import_data(snapshot, workspace.id().as_str())
        .await?;

    let mut titles: Vec<String> = app
        .tasks()
        .list(workspace.id())
        .await
        .iter()
        .map(|task| task.title().to_owned())
        .collect();
    titles.sort();
    ensure!(titles == ["Plan sprint", "Review PR"], "unexpected {titles:?}");
    ensure!(app.statuses().list(workspace.id()).await.len() == 5, "statuses");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn colliding_import_leaves_database_untouched(app: MemoryApp) -> Result<()> {
    let snapshot = populated(&app).await?;
    let side = app
        .create_workspace(NewWorkspace::new().with_name("Copy"))
        .await?;
    let before = app.engine().export_data().await?;

    let result = app
        .engine()
        .import_data(snapshot, side.id().as_str())
        .await;

    ensure!(
        matches!(
            result,
            Err(StorageError::TransactionAborted { operation: "import", .. })
        ),
        "expected aborted import, got {result:?}"
    );
    let after = app.engine().export_data().await?;
    ensure!(before == after, "failed import changed the database");
    ensure!(app.statuses().list(side.id()).await.len() == 5, "side seeds lost");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backup_of_several_workspaces_restores_each_one(app: MemoryApp) -> Result<()> {
    let home = app.bootstrap().await?;
    app.tasks().create(NewTask::new("Water plants"), home.id()).await?;
    let office = app
        .create_workspace(NewWorkspace::new().with_name("Office"))
        .await?;
    app.tasks().create(NewTask::new("File expenses"), office.id()).await?;
    let snapshot = app.engine().export_data().await?;

    let into_home = app
        .engine()
        .import_data(snapshot.clone(), home.id().as_str())
        .await?;
    let into_office = app
        .engine()
        .import_data(snapshot, office.id().as_str())
        .await?;

    ensure!(into_home.imported(StoreName::Tasks) == 1, "home tasks");
    ensure!(into_home.skipped() == 9, "office records not skipped");
    ensure!(into_office.imported(StoreName::Tasks) == 1, "office tasks");
    let home_titles: Vec<String> = app
        .tasks()
        .list(home.id())
        .await
        .iter()
        .map(|task| task.title().to_owned())
        .collect();
    let office_titles: Vec<String> = app
        .tasks()
        .list(office.id())
        .await
        .iter()
        .map(|task| task.title().to_owned())
        .collect();
    ensure!(home_titles == ["Water plants"], "home got {home_titles:?}");
    ensure!(office_titles == ["File expenses"], "office got {office_titles:?}");
    ensure!(app.statuses().list(home.id()).await.len() == 5, "home statuses");
    ensure!(app.statuses().list(office.id()).await.len() == 5, "office statuses");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn import_into_unknown_workspace_is_refused(app: MemoryApp) -> Result<()> {
    let snapshot = populated(&app).await?;
    let before = app.engine().export_data().await?;

    let result = app.engine().import_data(snapshot, "no-such-ws").await;

    ensure!(
        matches!(
            &result,
            Err(StorageError::TransactionAborted { operation: "import", source })
                if matches!(**source, StorageError::NotFound { store: StoreName::Workspaces, .. })
        ),
        "expected NotFound, got {result:?}"
    );
    ensure!(app.engine().export_data().await? == before, "database changed");
    Ok(())
}
