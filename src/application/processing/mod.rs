//! 应用层 - 任务执行
//!
//! Worker 调用的 TaskHandler 实现：TTS 合成处理器及繁忙重试装饰器

mod busy_retry;
mod tts_task_processor;

pub use busy_retry::{BusyRetryHandler, BusyRetryPolicy};
pub use tts_task_processor::TtsTaskProcessor;
