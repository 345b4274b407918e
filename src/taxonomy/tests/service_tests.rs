//! Unit tests for the taxonomy services.

use crate::entity::{Entity, ServiceError, StatusId, TagId, WorkspaceId};
use crate::storage::{
    adapters::InMemoryObjectStore,
    domain::{Record, StoreName},
    services::StorageEngine,
};
use crate::taxonomy::{
    domain::{RankedDraft, RankedPatch, TagDraft, TagPatch},
    services::{PriorityService, StatusService, TagService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

type Statuses = StatusService<InMemoryObjectStore, DefaultClock>;
type Priorities = PriorityService<InMemoryObjectStore, DefaultClock>;
type Tags = TagService<InMemoryObjectStore, DefaultClock>;

#[fixture]
fn engine() -> StorageEngine<InMemoryObjectStore> {
    StorageEngine::new(InMemoryObjectStore::new())
}

#[fixture]
fn statuses(engine: StorageEngine<InMemoryObjectStore>) -> Statuses {
    StatusService::new(engine, Arc::new(DefaultClock))
}

#[fixture]
fn workspace() -> WorkspaceId {
    WorkspaceId::from("ws-1")
}

fn names<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    entries.into_iter().map(str::to_owned).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ensure_defaults_seeds_statuses_in_order(statuses: Statuses, workspace: WorkspaceId) {
    assert!(statuses.ensure_defaults(&workspace).await);

    let listed = statuses.list(&workspace).await;
    let listed_names: Vec<String> = listed.iter().map(|s| s.name().to_owned()).collect();
    assert_eq!(
        listed_names,
        names(["Backlog", "In Progress", "Completed", "Blocked", "Cancelled"])
    );
    let orders: Vec<u32> = listed.iter().map(|s| s.order()).collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    assert_eq!(listed.first().map(|s| s.color().as_str()), Some("#3b82f6"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ensure_defaults_twice_seeds_once(statuses: Statuses, workspace: WorkspaceId) {
    assert!(statuses.ensure_defaults(&workspace).await);
    assert!(!statuses.ensure_defaults(&workspace).await);

    assert_eq!(statuses.list(&workspace).await.len(), 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_seeding_yields_one_set(statuses: Statuses, workspace: WorkspaceId) {
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let service = statuses.clone();
            let target = workspace.clone();
            tokio::spawn(async move { service.ensure_defaults(&target).await })
        })
        .collect();
    let mut seeded = 0;
    for handle in handles {
        if handle.await.expect("join") {
            seeded += 1;
        }
    }

    assert_eq!(seeded, 1);
    assert_eq!(statuses.list(&workspace).await.len(), 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_is_per_workspace(statuses: Statuses, workspace: WorkspaceId) {
    let other = WorkspaceId::from("ws-2");
    statuses.ensure_defaults(&workspace).await;
    statuses.ensure_defaults(&other).await;

    assert_eq!(statuses.list(&workspace).await.len(), 5);
    assert_eq!(statuses.list(&other).await.len(), 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_skips_records_that_do_not_decode(
    engine: StorageEngine<InMemoryObjectStore>,
    workspace: WorkspaceId,
) {
    let statuses = StatusService::new(engine.clone(), Arc::new(DefaultClock));
    statuses.ensure_defaults(&workspace).await;
    let broken = Record::from_value(json!({"id": "broken", "workspaceId": "ws-1"}))
        .expect("record");
    engine
        .add(StoreName::Statuses, broken)
        .await
        .expect("add broken status");

    let listed = statuses.list(&workspace).await;

    assert_eq!(listed.len(), 5);
    assert!(listed.iter().all(|s| s.id().as_str() != "broken"));
    let created = statuses
        .create(RankedDraft::new("Review"), &workspace)
        .await
        .expect("create beside broken record");
    assert_eq!(created.order(), 5);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_appends_after_last_order(statuses: Statuses, workspace: WorkspaceId) {
    statuses.ensure_defaults(&workspace).await;

    let created = statuses
        .create(RankedDraft::new("Review"), &workspace)
        .await
        .expect("create");

    assert_eq!(created.order(), 5);
    assert_eq!(created.color().as_str(), "#6b7280");
    let found = statuses.find(created.id()).await;
    assert_eq!(found, Some(created));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_in_empty_workspace_starts_at_zero(statuses: Statuses, workspace: WorkspaceId) {
    let created = statuses
        .create(RankedDraft::new("Only"), &workspace)
        .await
        .expect("create");

    assert_eq!(created.order(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_keeps_explicit_order(statuses: Statuses, workspace: WorkspaceId) {
    statuses.ensure_defaults(&workspace).await;

    let created = statuses
        .create(RankedDraft::new("Pinned").with_order(9), &workspace)
        .await
        .expect("create");

    assert_eq!(created.order(), 9);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_renames_and_keeps_identity(statuses: Statuses, workspace: WorkspaceId) {
    let created = statuses
        .create(RankedDraft::new("Doing"), &workspace)
        .await
        .expect("create");

    let updated = statuses
        .update(created.id(), RankedPatch::new().with_name("Doing now"))
        .await
        .expect("update");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.name(), "Doing now");
    assert_eq!(updated.created_at(), created.created_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_status_is_not_found(statuses: Statuses) {
    let result = statuses
        .update(&StatusId::from("missing"), RankedPatch::new().with_order(1))
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::NotFound { kind: "status", .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_order_assigns_positions(statuses: Statuses, workspace: WorkspaceId) {
    let a = statuses
        .create(RankedDraft::new("a"), &workspace)
        .await
        .expect("create a");
    let b = statuses
        .create(RankedDraft::new("b"), &workspace)
        .await
        .expect("create b");
    let c = statuses
        .create(RankedDraft::new("c"), &workspace)
        .await
        .expect("create c");

    let moved = statuses
        .update_order(vec![c.id().clone(), a.id().clone(), b.id().clone()])
        .await
        .expect("reorder");

    assert_eq!(moved, 3);
    let listed: Vec<(String, u32)> = statuses
        .list(&workspace)
        .await
        .iter()
        .map(|s| (s.name().to_owned(), s.order()))
        .collect();
    assert_eq!(
        listed,
        vec![("c".to_owned(), 0), ("a".to_owned(), 1), ("b".to_owned(), 2)]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_order_skips_unknown_ids(statuses: Statuses, workspace: WorkspaceId) {
    let a = statuses
        .create(RankedDraft::new("a"), &workspace)
        .await
        .expect("create a");
    let b = statuses
        .create(RankedDraft::new("b"), &workspace)
        .await
        .expect("create b");

    let moved = statuses
        .update_order(vec![StatusId::from("ghost"), b.id().clone()])
        .await
        .expect("reorder");

    assert_eq!(moved, 1);
    let reloaded_a = statuses.find(a.id()).await.expect("a exists");
    let reloaded_b = statuses.find(b.id()).await.expect("b exists");
    assert_eq!(reloaded_a.order(), 0);
    assert_eq!(reloaded_b.order(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_leaves_gap_in_orders(statuses: Statuses, workspace: WorkspaceId) {
    statuses.ensure_defaults(&workspace).await;
    let listed = statuses.list(&workspace).await;
    let in_progress = listed.get(1).expect("second status").id().clone();

    statuses.delete(&in_progress).await.expect("delete");

    let orders: Vec<u32> = statuses
        .list(&workspace)
        .await
        .iter()
        .map(|s| s.order())
        .collect();
    assert_eq!(orders, vec![0, 2, 3, 4]);
    assert_eq!(statuses.find(&in_progress).await, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priorities_seed_three_levels(engine: StorageEngine<InMemoryObjectStore>) {
    let priorities: Priorities = PriorityService::new(engine, Arc::new(DefaultClock));
    let workspace = WorkspaceId::from("ws-1");

    priorities.ensure_defaults(&workspace).await;

    let listed: Vec<String> = priorities
        .list(&workspace)
        .await
        .iter()
        .map(|p| p.name().to_owned())
        .collect();
    assert_eq!(listed, names(["Low", "Medium", "High"]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tags_seed_globally_and_update(engine: StorageEngine<InMemoryObjectStore>) {
    let tags: Tags = TagService::new(engine, Arc::new(DefaultClock));

    assert!(tags.ensure_defaults().await);
    assert!(!tags.ensure_defaults().await);
    let listed: Vec<String> = tags.list().await.iter().map(|t| t.name().to_owned()).collect();
    assert_eq!(listed, names(["Personal", "Learning", "Work"]));

    let created = tags
        .create(TagDraft::new("Errands").with_color("#123456").expect("colour"))
        .await
        .expect("create");
    let renamed = tags
        .update(created.id(), TagPatch::new().with_name("Chores"))
        .await
        .expect("update");
    assert_eq!(renamed.name(), "Chores");
    assert_eq!(renamed.color().as_str(), "#123456");

    tags.delete(created.id()).await.expect("delete");
    assert_eq!(tags.find(created.id()).await, None);
    assert!(matches!(
        tags.update(&TagId::from("missing"), TagPatch::new()).await,
        Err(ServiceError::NotFound { kind: "tag", .. })
    ));
}
