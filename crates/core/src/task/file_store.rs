//! File-based task storage implementation
//!
//! Stores tasks as a single versioned JSON document file on disk. The file
//! format evolves by adding optional fields only, so older files keep
//! loading without migration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Task;
use super::repository::TaskRepository;
use crate::{Error, Result};

/// Version written to every document file
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct TasksFile {
    schema: u32,
    tasks: Vec<Task>,
}

/// File-based task store using JSON
///
/// Tasks are kept in insertion order, both in the in-memory cache and in
/// the document file.
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of tasks, in insertion order
    cache: RwLock<Vec<Task>>,
}

impl FileTaskStore {
    /// Open the store at the given path
    ///
    /// If the file doesn't exist, it will be created on first write. A file
    /// written by a newer schema version is refused rather than misread.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let file: TasksFile = serde_json::from_str(&content)?;
            if file.schema > SCHEMA_VERSION {
                return Err(Error::Storage(format!(
                    "Task file {} has schema version {}, supported up to {}",
                    path.display(),
                    file.schema,
                    SCHEMA_VERSION
                )));
            }
            file.tasks
        } else {
            Vec::new()
        };

        tracing::debug!(path = %path.display(), count = tasks.len(), "task store opened");

        Ok(Self {
            path,
            cache: RwLock::new(tasks),
        })
    }

    /// Persist the cache to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let file = TasksFile {
            schema: SCHEMA_VERSION,
            tasks: cache.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn validate_name(task: &Task) -> Result<()> {
    if task.name.trim().is_empty() {
        return Err(Error::InvalidInput("Task name cannot be empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl TaskRepository for FileTaskStore {
    async fn create(&self, task: Task) -> Result<Task> {
        validate_name(&task)?;
        {
            let mut cache = self.cache.write().await;
            if cache.iter().any(|t| t.id == task.id) {
                return Err(Error::InvalidInput(format!(
                    "Task with ID {} already exists",
                    task.id
                )));
            }
            cache.push(task.clone());
        }
        self.persist().await?;
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let cache = self.cache.read().await;
        Ok(cache.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, task: Task) -> Result<Task> {
        validate_name(&task)?;
        {
            let mut cache = self.cache.write().await;
            let Some(existing) = cache.iter_mut().find(|t| t.id == task.id) else {
                return Err(Error::TaskNotFound(task.id.to_string()));
            };
            *existing = task.clone();
        }
        self.persist().await?;
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = {
            let mut cache = self.cache.write().await;
            let before = cache.len();
            cache.retain(|t| t.id != id);
            cache.len() != before
        };
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Task>> {
        let cache = self.cache.read().await;
        Ok(cache
            .iter()
            .filter(|t| t.completed == completed)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskKind;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileTaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let store = FileTaskStore::open(&path).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_create_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Milk", TaskKind::Buy, false).with_shop("CornerStore");
        let created = store.create(task.clone()).await.unwrap();

        assert_eq!(created.id, task.id);
        assert_eq!(created.name, "Milk");
        assert_eq!(created.shop, Some("CornerStore".to_string()));
    }

    #[tokio::test]
    async fn test_get_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Milk", TaskKind::Buy, false);
        let id = task.id;
        store.create(task).await.unwrap();

        let retrieved = store.get(id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().id, id);

        // Test non-existent task
        let non_existent = store.get(Uuid::new_v4()).await.unwrap();
        assert!(non_existent.is_none());
    }

    #[tokio::test]
    async fn test_update_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Milk", TaskKind::Buy, false);
        let id = task.id;
        store.create(task).await.unwrap();

        let mut updated_task = store.get(id).await.unwrap().unwrap();
        updated_task.name = "Oat milk".to_string();
        updated_task.completed = true;

        let result = store.update(updated_task).await.unwrap();
        assert_eq!(result.name, "Oat milk");
        assert!(result.completed);

        // Verify persistence
        let retrieved = store.get(id).await.unwrap().unwrap();
        assert_eq!(retrieved.name, "Oat milk");
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Milk", TaskKind::Buy, false);
        let result = store.update(task).await;

        assert!(result.is_err());
        match result.unwrap_err() {
            Error::TaskNotFound(_) => {}
            e => panic!("Expected TaskNotFound error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Milk", TaskKind::Buy, false);
        let id = task.id;
        store.create(task).await.unwrap();

        // Verify task exists
        assert!(store.get(id).await.unwrap().is_some());

        // Delete task
        let deleted = store.delete(id).await.unwrap();
        assert!(deleted);

        // Verify task is gone
        assert!(store.get(id).await.unwrap().is_none());

        // Delete again should return false
        let deleted_again = store.delete(id).await.unwrap();
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn test_find_by_completed() {
        let (store, _temp) = create_test_store().await;

        store
            .create(Task::new("Milk", TaskKind::Buy, false))
            .await
            .unwrap();
        store
            .create(Task::new("Dishes", TaskKind::Do, false))
            .await
            .unwrap();
        store
            .create(Task::new("Old bike", TaskKind::Sell, true))
            .await
            .unwrap();

        let active = store.find_by_completed(false).await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|t| !t.completed));

        let history = store.find_by_completed(true).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Old bike");
    }

    #[tokio::test]
    async fn test_insertion_order_preserved() {
        let (store, _temp) = create_test_store().await;

        for name in ["First", "Second", "Third"] {
            store
                .create(Task::new(name, TaskKind::Do, false))
                .await
                .unwrap();
        }

        let tasks = store.find_by_completed(false).await.unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let task_id;

        // Create store and add task
        {
            let store = FileTaskStore::open(&path).await.unwrap();
            let task = Task::new("Milk", TaskKind::Buy, false)
                .with_shop("CornerStore")
                .with_extra("2 liters");
            task_id = task.id;
            store.create(task).await.unwrap();
        }

        // Create new store instance and verify data persisted
        {
            let store = FileTaskStore::open(&path).await.unwrap();
            let task = store.get(task_id).await.unwrap();
            assert!(task.is_some());
            let task = task.unwrap();
            assert_eq!(task.name, "Milk");
            assert_eq!(task.shop, Some("CornerStore".to_string()));
            assert_eq!(task.extra, Some("2 liters".to_string()));
        }
    }

    #[tokio::test]
    async fn test_duplicate_task_error() {
        let (store, _temp) = create_test_store().await;

        let task = Task::new("Milk", TaskKind::Buy, false);
        store.create(task.clone()).await.unwrap();

        // Try to create same task again
        let result = store.create(task).await;
        assert!(result.is_err());
        match result.unwrap_err() {
            Error::InvalidInput(msg) => {
                assert!(msg.contains("already exists"));
            }
            e => panic!("Expected InvalidInput error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (store, _temp) = create_test_store().await;

        let result = store.create(Task::new("   ", TaskKind::Do, false)).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let task = Task::new("Milk", TaskKind::Buy, false);
        let id = task.id;
        store.create(task).await.unwrap();

        let mut blanked = store.get(id).await.unwrap().unwrap();
        blanked.name = String::new();
        let result = store.update(blanked).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_newer_schema_version_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        tokio::fs::write(&path, r#"{"schema": 2, "tasks": []}"#)
            .await
            .unwrap();

        let result = FileTaskStore::open(&path).await;
        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
