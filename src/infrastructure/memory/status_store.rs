//! In-Memory Status Store
//!
//! task_id -> StatusRecord。记录从入队起一直保留到进程退出，没有淘汰策略。

use dashmap::DashMap;
use serde_json::Value;

use crate::application::ports::StatusRecord;
use crate::domain::JobStatus;

/// 内存状态表
#[derive(Default)]
pub struct StatusStore {
    records: DashMap<String, StatusRecord>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// 确保记录存在（不存在时插入空记录）
    pub fn ensure(&self, task_id: &str) {
        self.records.entry(task_id.to_string()).or_default();
    }

    /// 覆盖状态
    ///
    /// succeeded 保存 payload 为结果，failed 保存 payload 的字符串形式为错误，其余状态清空两者
    pub fn apply(&self, task_id: &str, status: JobStatus, payload: Option<&Value>) {
        let mut record = self.records.entry(task_id.to_string()).or_default();
        record.status = Some(status);
        record.result = None;
        record.error = None;

        match status {
            JobStatus::Succeeded => record.result = payload.cloned(),
            JobStatus::Failed => record.error = payload.map(error_message),
            JobStatus::Queued | JobStatus::Running | JobStatus::Cancelled => {}
        }
    }

    /// 未被取消时原子地切换为 running，返回是否切换成功
    pub fn begin_running(&self, task_id: &str) -> bool {
        let mut record = self.records.entry(task_id.to_string()).or_default();
        if record.status == Some(JobStatus::Cancelled) {
            return false;
        }
        record.status = Some(JobStatus::Running);
        record.result = None;
        record.error = None;
        true
    }

    pub fn get(&self, task_id: &str) -> Option<StatusRecord> {
        self.records.get(task_id).map(|r| r.clone())
    }

    pub fn is_cancelled(&self, task_id: &str) -> bool {
        self.records
            .get(task_id)
            .map(|r| r.status == Some(JobStatus::Cancelled))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 错误载荷通常是字符串，其它 JSON 值按原样序列化
fn error_message(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
