//! Service for tasks.

use crate::entity::{Entity, EntityRepository, ServiceError, ServiceResult, TaskId, WorkspaceId};
use crate::storage::{ports::ObjectStore, services::StorageEngine};
use crate::task::domain::{NewTask, Task, TaskFilter, TaskPatch, TaskSort};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Task orchestration over one storage engine.
pub struct TaskService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    repository: EntityRepository<Task, S>,
    clock: Arc<C>,
}

impl<S, C> Clone for TaskService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> TaskService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a task service.
    #[must_use]
    pub fn new(engine: StorageEngine<S>, clock: Arc<C>) -> Self {
        Self {
            repository: EntityRepository::new(engine),
            clock,
        }
    }

    /// Returns the workspace's tasks in insertion order.
    ///
    /// Read failures are logged and yield an empty list.
    pub async fn list(&self, workspace_id: &WorkspaceId) -> Vec<Task> {
        self.repository
            .list_in(workspace_id)
            .await
            .inspect_err(|err| warn!(%workspace_id, error = %err, "failed to list tasks"))
            .unwrap_or_default()
    }

    /// Returns one task.
    pub async fn find(&self, id: &TaskId) -> Option<Task> {
        self.repository
            .find(id.as_str())
            .await
            .inspect_err(|err| warn!(%id, error = %err, "failed to load task"))
            .ok()
            .flatten()
    }

    /// Creates a task in a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the task cannot be stored.
    pub async fn create(&self, request: NewTask, workspace_id: &WorkspaceId) -> ServiceResult<Task> {
        let task = request.build(workspace_id.clone(), self.clock.utc());
        self.repository.insert(&task).await.inspect_err(|err| {
            error!(%workspace_id, error = %err, "failed to create task");
        })?;
        debug!(id = %task.id(), %workspace_id, "task created");
        Ok(task)
    }

    /// Applies a patch and refreshes `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown identifier, or
    /// [`ServiceError::Storage`] when the task cannot be written.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> ServiceResult<Task> {
        self.repository
            .modify(id.as_str(), patch, self.clock.utc())
            .await
            .inspect_err(|err| error!(%id, error = %err, "failed to update task"))?
            .ok_or_else(|| ServiceError::not_found("task", id.as_str()))
    }

    /// Deletes a task. Its attachments are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the task cannot be deleted.
    pub async fn delete(&self, id: &TaskId) -> ServiceResult<()> {
        self.repository
            .delete(id.as_str())
            .await
            .inspect_err(|err| error!(%id, error = %err, "failed to delete task"))?;
        Ok(())
    }

    /// Returns the workspace's tasks that pass `filter`, ordered by `sort`.
    ///
    /// Due windows are evaluated against the service clock.
    pub async fn query(
        &self,
        workspace_id: &WorkspaceId,
        filter: &TaskFilter,
        sort: TaskSort,
    ) -> Vec<Task> {
        let mut tasks = filter.apply(self.list(workspace_id).await, self.clock.utc());
        sort.sort(&mut tasks);
        tasks
    }
}
