//! Voice Queries

/// 获取音色详情查询
#[derive(Debug, Clone)]
pub struct GetVoice {
    pub voice_id: String,
}

/// 列出音色查询
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
