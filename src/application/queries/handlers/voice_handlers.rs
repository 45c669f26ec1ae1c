//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceRepositoryPort;
use crate::application::queries::{GetVoice, ListVoices};
use crate::domain::Voice;

/// 默认每页数量
pub const DEFAULT_VOICE_PAGE_SIZE: u32 = 20;
/// 每页数量上限
pub const MAX_VOICE_PAGE_SIZE: u32 = 100;

/// GetVoice Handler
pub struct GetVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl GetVoiceHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, query: GetVoice) -> Result<Voice, ApplicationError> {
        self.voice_repo
            .find_by_id(&query.voice_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Voice", query.voice_id))
    }
}

/// ListVoices Handler
///
/// limit 取值 1..=100，默认 20
pub struct ListVoicesHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl ListVoicesHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(&self, query: ListVoices) -> Result<Vec<Voice>, ApplicationError> {
        let limit = query.limit.unwrap_or(DEFAULT_VOICE_PAGE_SIZE);
        if !(1..=MAX_VOICE_PAGE_SIZE).contains(&limit) {
            return Err(ApplicationError::validation(format!(
                "limit must be between 1 and {}",
                MAX_VOICE_PAGE_SIZE
            )));
        }

        Ok(self
            .voice_repo
            .list(limit, query.offset.unwrap_or(0))
            .await?)
    }
}
