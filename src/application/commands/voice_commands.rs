//! Voice Commands - 音色与上传命令

/// 上传音频文件命令
///
/// 文件名和 Content-Type 由客户端提供，可能缺失
#[derive(Debug, Clone)]
pub struct CreateUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// 创建音色命令
#[derive(Debug, Clone)]
pub struct CreateVoice {
    pub name: String,
    pub description: Option<String>,
    pub upload_id: String,
}

/// 删除音色命令（连同其参考音频）
#[derive(Debug, Clone)]
pub struct DeleteVoice {
    pub voice_id: String,
}
