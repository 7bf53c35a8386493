mod memory_task_store;
mod redis_task_store;

pub use memory_task_store::create_memory_task_store;
pub use redis_task_store::create_redis_task_store;
