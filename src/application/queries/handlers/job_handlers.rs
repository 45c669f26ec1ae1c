//! Job Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{JobFilter, JobRepositoryPort};
use crate::application::queries::{GetJob, ListJobs};
use crate::domain::TtsJob;

/// GetJob Handler
pub struct GetJobHandler {
    job_repo: Arc<dyn JobRepositoryPort>,
}

impl GetJobHandler {
    pub fn new(job_repo: Arc<dyn JobRepositoryPort>) -> Self {
        Self { job_repo }
    }

    pub async fn handle(&self, query: GetJob) -> Result<TtsJob, ApplicationError> {
        self.job_repo
            .get(&query.job_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Job", query.job_id))
    }
}

/// ListJobs Handler
///
/// 按创建时间倒序，默认 limit=100、offset=0
pub struct ListJobsHandler {
    job_repo: Arc<dyn JobRepositoryPort>,
}

impl ListJobsHandler {
    pub fn new(job_repo: Arc<dyn JobRepositoryPort>) -> Self {
        Self { job_repo }
    }

    pub async fn handle(&self, query: ListJobs) -> Result<Vec<TtsJob>, ApplicationError> {
        let defaults = JobFilter::default();
        let filter = JobFilter {
            status: query.status,
            limit: query.limit.unwrap_or(defaults.limit),
            offset: query.offset.unwrap_or(defaults.offset),
        };

        Ok(self.job_repo.list(filter).await?)
    }
}
