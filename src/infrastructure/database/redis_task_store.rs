use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Task, TaskStore, TaskStorePtr};

/// Redis list holding task ids, newest first.
const TASK_INDEX_KEY: &str = "tasks:index";

pub fn create_redis_task_store(client: Client) -> TaskStorePtr {
    // ---
    Arc::new(RedisTaskStore::new(client))
}

pub struct RedisTaskStore {
    // ---
    client: Client,
}

impl RedisTaskStore {
    // ---
    pub fn new(client: Client) -> Self {
        // ---
        Self { client }
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Redis")
    }

    fn task_key(id: &str) -> String {
        // ---
        format!("task:{id}")
    }
}

#[async_trait::async_trait]
impl TaskStore for RedisTaskStore {
    // ---
    async fn create(&self, title: &str) -> Result<Task> {
        // ---
        let task = Task::new(title);
        let mut conn = self.conn().await?;

        let fields = [
            ("id", task.id.clone()),
            ("title", task.title.clone()),
            ("done", task.done.to_string()),
            ("created_at", task.created_at.to_rfc3339()),
        ];
        let _: () = conn.hset_multiple(Self::task_key(&task.id), &fields).await?;
        let _: () = conn.lpush(TASK_INDEX_KEY, &task.id).await?;

        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>> {
        // ---
        let mut conn = self.conn().await?;

        let ids: Vec<String> = conn.lrange(TASK_INDEX_KEY, 0, -1).await?;
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            let fields: Vec<(String, String)> = conn.hgetall(Self::task_key(&id)).await?;
            if fields.is_empty() {
                continue;
            }

            let map: HashMap<String, String> = fields.into_iter().collect();
            tasks.push(Task {
                id: map.get("id").cloned().unwrap_or(id),
                title: map.get("title").cloned().unwrap_or_default(),
                done: map.get("done").map(|d| d == "true").unwrap_or(false),
                created_at: map
                    .get("created_at")
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(Utc::now),
            });
        }

        Ok(tasks)
    }
}
