//! Memory Layer - In-Memory State Management
//!
//! 实现 TaskQueue、StatusStore 和 QueueManager，管理排队任务与任务状态

mod queue_manager;
mod status_store;
mod task_queue;

pub use queue_manager::InMemoryQueueManager;
pub use status_store::StatusStore;
pub use task_queue::{task_queue, TaskEnvelope, TaskQueueReceiver, TaskQueueSender};
