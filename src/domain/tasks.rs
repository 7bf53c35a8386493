use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A single task list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh, not-yet-done task with a random id.
    pub fn new(title: &str) -> Self {
        Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            done: false,
            created_at: Utc::now(),
        }
    }
}

/// Abstraction for task persistence.
#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    // ---
    /// Persist a new task with the given title.
    async fn create(&self, title: &str) -> Result<Task>;

    /// All tasks, newest first.
    async fn list(&self) -> Result<Vec<Task>>;
}

/// Type alias for any backend that implements TaskStore.
pub type TaskStorePtr = Arc<dyn TaskStore>;
