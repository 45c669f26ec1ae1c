//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现，以及持久化状态变更的回调

mod job_handlers;
mod job_status_handler;
mod voice_handlers;

pub use job_handlers::*;
pub use job_status_handler::*;
pub use voice_handlers::*;
