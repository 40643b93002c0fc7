//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use tasklist_core::task::FileTaskStore;

/// Shared application state
///
/// Owns the task store handle for the lifetime of the server; handlers
/// borrow it through the accessor instead of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub task_store: FileTaskStore,
}

impl AppState {
    /// Create a new AppState with the given data directory
    pub async fn new(data_dir: PathBuf) -> tasklist_core::Result<Self> {
        let tasks_path = data_dir.join("tasks.json");
        let task_store = FileTaskStore::open(tasks_path).await?;

        Ok(Self {
            inner: Arc::new(AppStateInner { task_store }),
        })
    }

    /// Get reference to the task store
    pub fn task_store(&self) -> &FileTaskStore {
        &self.inner.task_store
    }
}
