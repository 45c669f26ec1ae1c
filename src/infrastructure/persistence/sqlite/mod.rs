//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod job_repo;
mod upload_repo;
mod voice_repo;

pub use database::*;
pub use job_repo::*;
pub use upload_repo::*;
pub use voice_repo::*;
