use anyhow::Result;
use std::sync::{Arc, Mutex};

use crate::domain::{Task, TaskStore, TaskStorePtr};

pub fn create_memory_task_store() -> TaskStorePtr {
    // ---
    Arc::new(MemoryTaskStore::new())
}

/// In-memory task store.
///
/// Keeps tasks in insertion order behind a mutex. Used by the test suite and
/// for running the service without a Redis server.
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    // ---
    pub fn new() -> Self {
        // ---
        Self {
            tasks: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl TaskStore for MemoryTaskStore {
    // ---
    async fn create(&self, title: &str) -> Result<Task> {
        // ---
        let task = Task::new(title);
        self.tasks
            .lock()
            .expect("task store lock poisoned")
            .push(task.clone());
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>> {
        // ---
        let tasks = self.tasks.lock().expect("task store lock poisoned");
        Ok(tasks.iter().rev().cloned().collect())
    }
}
