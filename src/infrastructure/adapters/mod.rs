//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod sleeper;
pub mod storage;
pub mod tts;

pub use sleeper::TokioSleeper;
pub use storage::*;
pub use tts::*;
