//! In-Memory Queue Manager Implementation

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

use super::status_store::StatusStore;
use super::task_queue::{TaskEnvelope, TaskQueueSender};
use crate::application::ports::{QueueError, QueueManagerPort, StatusChangeCallback, TaskStatus};
use crate::domain::JobStatus;

/// 内存队列管理器
///
/// 组合 StatusStore、队列发送端和当前任务指针。
/// 所有状态变更（连同回调）在 `transitions` 锁内串行执行，
/// 保证同一任务的回调顺序与内存状态一致。
pub struct InMemoryQueueManager {
    /// task_id -> StatusRecord
    store: StatusStore,
    /// 任务队列发送端
    queue: TaskQueueSender,
    /// Worker 当前持有的任务
    running: Mutex<Option<String>>,
    /// 状态变更回调
    callback: RwLock<Option<Arc<dyn StatusChangeCallback>>>,
    transitions: tokio::sync::Mutex<()>,
}

impl InMemoryQueueManager {
    pub fn new(queue: TaskQueueSender) -> Self {
        Self {
            store: StatusStore::new(),
            queue,
            running: Mutex::new(None),
            callback: RwLock::new(None),
            transitions: tokio::sync::Mutex::new(()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 已登记的任务数（包括已完成的任务）
    pub fn tracked_count(&self) -> usize {
        self.store.len()
    }

    async fn notify(&self, task_id: &str, status: JobStatus, payload: Option<&Value>) {
        let callback = self
            .callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(callback) = callback {
            if let Err(e) = callback.on_transition(task_id, status, payload).await {
                tracing::error!(
                    task_id = %task_id,
                    status = %status,
                    error = %e,
                    "Status callback failed"
                );
            }
        }
    }

    fn set_running(&self, task_id: Option<String>) {
        *self.running.lock().unwrap_or_else(PoisonError::into_inner) = task_id;
    }
}

#[async_trait]
impl QueueManagerPort for InMemoryQueueManager {
    fn set_callback(&self, callback: Arc<dyn StatusChangeCallback>) {
        *self.callback.write().unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    async fn register(&self) -> String {
        let task_id = Uuid::new_v4().to_string();
        self.store.ensure(&task_id);
        self.set_status(&task_id, JobStatus::Queued, None).await;
        task_id
    }

    async fn publish(&self, task_id: &str, payload: Value) -> Result<(), QueueError> {
        if let Err(e) = self.queue.push(TaskEnvelope::new(task_id.to_string(), payload)) {
            tracing::warn!(task_id = %task_id, error = %e, "Failed to enqueue task");
            self.set_status(task_id, JobStatus::Failed, Some(Value::String(e.to_string())))
                .await;
            return Err(e);
        }

        tracing::debug!(
            task_id = %task_id,
            queue_length = self.queue.len(),
            "Task enqueued"
        );
        Ok(())
    }

    fn status(&self, task_id: &str) -> TaskStatus {
        match self.store.get(task_id) {
            Some(record) => TaskStatus::Tracked(record),
            None => TaskStatus::NotFound,
        }
    }

    async fn set_status(&self, task_id: &str, status: JobStatus, payload: Option<Value>) {
        let _guard = self.transitions.lock().await;

        let old_status = self.store.get(task_id).and_then(|r| r.status);
        self.store.apply(task_id, status, payload.as_ref());

        tracing::debug!(
            task_id = %task_id,
            old_status = ?old_status,
            new_status = %status,
            "Task status changed"
        );

        self.notify(task_id, status, payload.as_ref()).await;
    }

    async fn cancel(&self, task_id: &str) {
        // 取消可能早于入队完成，未知任务也登记一条记录
        self.store.ensure(task_id);
        self.set_status(task_id, JobStatus::Cancelled, None).await;
        tracing::info!(task_id = %task_id, "Task cancelled");
    }

    async fn start(&self, task_id: &str) -> bool {
        let _guard = self.transitions.lock().await;

        if !self.store.begin_running(task_id) {
            return false;
        }
        self.set_running(Some(task_id.to_string()));

        tracing::debug!(task_id = %task_id, new_status = %JobStatus::Running, "Task status changed");
        self.notify(task_id, JobStatus::Running, None).await;
        true
    }

    fn clear_running(&self) {
        self.set_running(None);
    }

    fn running_job_id(&self) -> Option<String> {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn queue_length(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CallbackError;
    use crate::infrastructure::memory::task_queue::task_queue;
    use serde_json::json;
    use std::time::Duration;

    /// 记录所有回调的测试用回调
    #[derive(Default)]
    struct RecordingCallback {
        calls: Mutex<Vec<(String, JobStatus, Option<Value>)>>,
    }

    impl RecordingCallback {
        fn statuses_for(&self, task_id: &str) -> Vec<JobStatus> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _, _)| id == task_id)
                .map(|(_, status, _)| *status)
                .collect()
        }
    }

    #[async_trait]
    impl StatusChangeCallback for RecordingCallback {
        async fn on_transition(
            &self,
            task_id: &str,
            status: JobStatus,
            payload: Option<&Value>,
        ) -> Result<(), CallbackError> {
            self.calls
                .lock()
                .unwrap()
                .push((task_id.to_string(), status, payload.cloned()));
            Ok(())
        }
    }

    struct FailingCallback;

    #[async_trait]
    impl StatusChangeCallback for FailingCallback {
        async fn on_transition(
            &self,
            _task_id: &str,
            _status: JobStatus,
            _payload: Option<&Value>,
        ) -> Result<(), CallbackError> {
            Err(CallbackError::Persistence("database is locked".to_string()))
        }
    }

    #[tokio::test]
    async fn test_enqueue_marks_queued() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);
        let callback = Arc::new(RecordingCallback::default());
        manager.set_callback(callback.clone());

        let task_id = manager.enqueue(json!({"text": "hello"})).await.unwrap();

        assert_eq!(manager.status(&task_id).status(), Some(JobStatus::Queued));
        assert_eq!(manager.queue_length(), 1);
        assert_eq!(callback.statuses_for(&task_id), vec![JobStatus::Queued]);
        assert!(manager.running_job_id().is_none());
    }

    #[tokio::test]
    async fn test_registered_task_is_not_consumable_until_published() {
        let (tx, mut rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);

        let task_id = manager.register().await;
        assert_eq!(manager.status(&task_id).status(), Some(JobStatus::Queued));
        assert_eq!(manager.queue_length(), 0);
        let nothing = tokio::time::timeout(Duration::from_millis(20), rx.recv()).await;
        assert!(nothing.is_err());

        manager.publish(&task_id, json!({"n": 1})).await.unwrap();
        assert_eq!(manager.queue_length(), 1);
        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.id, task_id);
        assert_eq!(envelope.payload, json!({"n": 1}));
    }

    #[tokio::test]
    async fn test_enqueue_generates_unique_ids() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);

        let a = manager.enqueue(json!(1)).await.unwrap();
        let b = manager.enqueue(json!(2)).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(manager.tracked_count(), 2);
    }

    #[tokio::test]
    async fn test_enqueue_on_closed_queue_fails() {
        let (tx, rx) = task_queue();
        drop(rx);
        let manager = InMemoryQueueManager::new(tx);

        let result = manager.enqueue(json!(null)).await;
        assert!(matches!(result, Err(QueueError::Closed)));
        assert_eq!(manager.queue_length(), 0);
    }

    #[tokio::test]
    async fn test_status_of_unknown_task() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);

        let status = manager.status("missing");
        assert_eq!(status, TaskStatus::NotFound);
        assert_eq!(status.label(), "not_found");
        assert!(status.result().is_none());
    }

    #[tokio::test]
    async fn test_cancel_unknown_task_is_tolerated() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);
        let callback = Arc::new(RecordingCallback::default());
        manager.set_callback(callback.clone());

        manager.cancel("ghost").await;

        assert_eq!(manager.status("ghost").status(), Some(JobStatus::Cancelled));
        assert_eq!(callback.statuses_for("ghost"), vec![JobStatus::Cancelled]);
    }

    /// 当前行为：取消不检查终态，已成功的任务会被覆盖为 cancelled
    #[tokio::test]
    async fn test_cancel_overwrites_terminal_status() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);

        let task_id = manager.enqueue(json!(null)).await.unwrap();
        manager
            .set_status(&task_id, JobStatus::Succeeded, Some(json!({"ok": true})))
            .await;
        manager.cancel(&task_id).await;

        let status = manager.status(&task_id);
        assert_eq!(status.status(), Some(JobStatus::Cancelled));
        assert!(status.result().is_none());
    }

    #[tokio::test]
    async fn test_start_skips_cancelled_task() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);
        let callback = Arc::new(RecordingCallback::default());
        manager.set_callback(callback.clone());

        let task_id = manager.enqueue(json!(null)).await.unwrap();
        manager.cancel(&task_id).await;

        assert!(!manager.start(&task_id).await);
        assert!(manager.running_job_id().is_none());
        assert_eq!(
            callback.statuses_for(&task_id),
            vec![JobStatus::Queued, JobStatus::Cancelled]
        );
    }

    #[tokio::test]
    async fn test_start_sets_running_pointer() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);

        let task_id = manager.enqueue(json!(null)).await.unwrap();
        assert!(manager.start(&task_id).await);
        assert_eq!(manager.running_job_id(), Some(task_id.clone()));
        assert_eq!(manager.status(&task_id).status(), Some(JobStatus::Running));

        manager.clear_running();
        assert!(manager.running_job_id().is_none());
    }

    #[tokio::test]
    async fn test_callback_failure_keeps_memory_state() {
        let (tx, _rx) = task_queue();
        let manager = InMemoryQueueManager::new(tx);
        manager.set_callback(Arc::new(FailingCallback));

        let task_id = manager.enqueue(json!(null)).await.unwrap();
        manager
            .set_status(&task_id, JobStatus::Failed, Some(json!("synthesis failed")))
            .await;

        let status = manager.status(&task_id);
        assert_eq!(status.status(), Some(JobStatus::Failed));
        assert_eq!(status.error(), Some("synthesis failed"));
    }
}
