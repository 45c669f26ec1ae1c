//! Worker Layer - Background Task Processing
//!
//! 实现 TaskWorker，串行处理 TTS 合成任务

mod task_worker;

pub use task_worker::{TaskWorker, WorkerHandle};
