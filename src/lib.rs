//! ttsq - 单并发 TTS 任务代理
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Job Context: TTS 任务、状态机与请求校验
//!
//! 应用层 (application/):
//! - Ports: 端口定义（QueueManager, TaskHandler, TtsEngine, AudioStorage, Repositories）
//! - Commands: 创建 / 取消 / 重试任务，状态变更回调
//! - Queries: 任务详情、任务列表、队列状态
//! - Processing: TTS 任务处理器与繁忙重试装饰器
//!
//! 基础设施层 (infrastructure/):
//! - Memory: TaskQueue, StatusStore, QueueManager 内存实现
//! - Worker: TaskWorker 单消费者后台循环
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储
//! - Adapters: TTS Client, 文件存储, Sleeper

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
