//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 上传音频的格式与大小校验
//! - 音色与其参考音频（一个上传文件）的关联

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{Upload, Voice};
pub use errors::VoiceError;
pub use value_objects::{is_allowed_content_type, AudioFormat, MAX_UPLOAD_BYTES};
