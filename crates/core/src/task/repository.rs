//! Task repository trait
//!
//! Defines the interface for task storage operations: create, read and
//! delete by id, update, and the completed-flag filtered find.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Task;
use crate::Result;

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// Update an existing task
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID, returning whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Find tasks by completion state, in insertion order
    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Task>>;
}
