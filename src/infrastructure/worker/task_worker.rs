//! Task Worker - Background TTS Task Processor

use chrono::Utc;
use futures_util::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::ports::{QueueManagerPort, TaskHandler};
use crate::domain::JobStatus;
use crate::infrastructure::memory::{TaskEnvelope, TaskQueueReceiver};

/// 任务 Worker
///
/// 唯一的队列消费者：一次只取一个任务，执行完成后才取下一个。
/// 单并发由结构保证（接收端只有一个，不开任务池）。
pub struct TaskWorker {
    queue_receiver: TaskQueueReceiver,
    queue_manager: Arc<dyn QueueManagerPort>,
    handler: Arc<dyn TaskHandler>,
    stop: Arc<AtomicBool>,
}

impl TaskWorker {
    pub fn new(
        queue_receiver: TaskQueueReceiver,
        queue_manager: Arc<dyn QueueManagerPort>,
        handler: Arc<dyn TaskHandler>,
    ) -> Self {
        Self {
            queue_receiver,
            queue_manager,
            handler,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 在后台启动 Worker
    pub fn spawn(self) -> WorkerHandle {
        let stop = self.stop.clone();
        let join = tokio::spawn(self.run());
        WorkerHandle { stop, join }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!("TaskWorker started");

        while !self.stop.load(Ordering::SeqCst) {
            let Some(task) = self.queue_receiver.recv().await else {
                break;
            };
            self.process_task(task).await;
        }

        tracing::info!("TaskWorker stopped");
    }

    /// 处理单个任务
    ///
    /// 处理器的任何错误（包括 panic）都转换为 failed，不会中断循环
    async fn process_task(&self, task: TaskEnvelope) {
        let task_id = task.id;

        // 协作式取消：只在出队时检查
        if !self.queue_manager.start(&task_id).await {
            tracing::debug!(task_id = %task_id, "Task cancelled, skipping");
            return;
        }

        tracing::info!(
            task_id = %task_id,
            waited_ms = (Utc::now() - task.enqueued_at).num_milliseconds(),
            "Task started"
        );

        let outcome = AssertUnwindSafe(self.handler.handle(task.payload))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => {
                self.queue_manager
                    .set_status(&task_id, JobStatus::Succeeded, Some(result))
                    .await;
                tracing::info!(task_id = %task_id, "Task completed");
            }
            Ok(Err(e)) => {
                tracing::error!(task_id = %task_id, error = %e, "Task failed");
                self.queue_manager
                    .set_status(&task_id, JobStatus::Failed, Some(Value::String(e.to_string())))
                    .await;
            }
            Err(_) => {
                tracing::error!(task_id = %task_id, "Task handler panicked");
                self.queue_manager
                    .set_status(
                        &task_id,
                        JobStatus::Failed,
                        Some(Value::String("task handler panicked".to_string())),
                    )
                    .await;
            }
        }

        self.queue_manager.clear_running();
    }
}

/// 后台 Worker 句柄
pub struct WorkerHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// 停止 Worker：设置停止标志，取消后台任务并等待其结束。
    /// 取消产生的 JoinError 属于正常关闭，不视为错误。
    pub async fn shutdown(self) {
        self.stop.store(true, Ordering::SeqCst);
        self.join.abort();

        match self.join.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {
                tracing::debug!("TaskWorker cancelled");
            }
            Err(e) => {
                tracing::error!(error = %e, "TaskWorker terminated abnormally");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        CallbackError, HandlerError, QueueError, StatusChangeCallback,
    };
    use crate::infrastructure::memory::{task_queue, InMemoryQueueManager};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::{mpsc, Semaphore};

    /// 每次调用先报告 payload，再等待放行
    struct GatedHandler {
        started: mpsc::UnboundedSender<Value>,
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl TaskHandler for GatedHandler {
        async fn handle(&self, payload: Value) -> Result<Value, HandlerError> {
            let _ = self.started.send(payload.clone());
            self.gate
                .acquire()
                .await
                .map_err(|_| HandlerError::Failed("gate closed".to_string()))?
                .forget();

            if payload.get("panic").is_some() {
                panic!("handler blew up");
            }
            if let Some(message) = payload.get("fail").and_then(|v| v.as_str()) {
                return Err(HandlerError::Failed(message.to_string()));
            }
            Ok(json!({ "echo": payload }))
        }
    }

    #[derive(Default)]
    struct RecordingCallback {
        calls: Mutex<Vec<(String, JobStatus)>>,
    }

    impl RecordingCallback {
        fn statuses_for(&self, task_id: &str) -> Vec<JobStatus> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| id == task_id)
                .map(|(_, status)| *status)
                .collect()
        }
    }

    #[async_trait]
    impl StatusChangeCallback for RecordingCallback {
        async fn on_transition(
            &self,
            task_id: &str,
            status: JobStatus,
            _payload: Option<&Value>,
        ) -> Result<(), CallbackError> {
            self.calls.lock().unwrap().push((task_id.to_string(), status));
            Ok(())
        }
    }

    struct Harness {
        manager: Arc<InMemoryQueueManager>,
        callback: Arc<RecordingCallback>,
        started: mpsc::UnboundedReceiver<Value>,
        gate: Arc<Semaphore>,
        worker: Option<TaskWorker>,
    }

    impl Harness {
        fn new() -> Self {
            let (tx, rx) = task_queue();
            let manager = Arc::new(InMemoryQueueManager::new(tx));
            let callback = Arc::new(RecordingCallback::default());
            manager.set_callback(callback.clone());

            let (started_tx, started) = mpsc::unbounded_channel();
            let gate = Arc::new(Semaphore::new(0));
            let handler = Arc::new(GatedHandler {
                started: started_tx,
                gate: gate.clone(),
            });
            let worker = TaskWorker::new(rx, manager.clone(), handler);

            Self {
                manager,
                callback,
                started,
                gate,
                worker: Some(worker),
            }
        }

        fn spawn(&mut self) -> WorkerHandle {
            self.worker.take().expect("worker already spawned").spawn()
        }

        async fn next_started(&mut self) -> Value {
            tokio::time::timeout(Duration::from_secs(5), self.started.recv())
                .await
                .expect("handler was not invoked in time")
                .expect("handler channel closed")
        }

        async fn wait_for(&self, task_id: &str, status: JobStatus) {
            let manager = self.manager.clone();
            let waiting = async {
                while manager.status(task_id).status() != Some(status) {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            };
            tokio::time::timeout(Duration::from_secs(5), waiting)
                .await
                .expect("task did not reach expected status");
        }
    }

    #[tokio::test]
    async fn test_single_task_lifecycle() {
        let mut h = Harness::new();
        let task_a = h.manager.enqueue(json!({"name": "A"})).await.unwrap();
        assert_eq!(h.manager.status(&task_a).status(), Some(JobStatus::Queued));

        let handle = h.spawn();
        assert_eq!(h.next_started().await, json!({"name": "A"}));
        assert_eq!(h.manager.status(&task_a).status(), Some(JobStatus::Running));
        assert_eq!(h.manager.running_job_id(), Some(task_a.clone()));

        h.gate.add_permits(1);
        h.wait_for(&task_a, JobStatus::Succeeded).await;

        let status = h.manager.status(&task_a);
        assert_eq!(status.result(), Some(&json!({"echo": {"name": "A"}})));
        assert_eq!(
            h.callback.statuses_for(&task_a),
            vec![JobStatus::Queued, JobStatus::Running, JobStatus::Succeeded]
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_tasks_start_in_fifo_order() {
        let mut h = Harness::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(h.manager.enqueue(json!(i)).await.unwrap());
        }

        let handle = h.spawn();
        h.gate.add_permits(5);

        for i in 0..5 {
            assert_eq!(h.next_started().await, json!(i));
        }
        h.wait_for(&ids[4], JobStatus::Succeeded).await;

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_queue_length_excludes_running_task() {
        let mut h = Harness::new();
        let first = h.manager.enqueue(json!(1)).await.unwrap();
        h.manager.enqueue(json!(2)).await.unwrap();
        h.manager.enqueue(json!(3)).await.unwrap();
        assert_eq!(h.manager.queue_length(), 3);

        let handle = h.spawn();
        h.next_started().await;

        assert_eq!(h.manager.queue_length(), 2);
        assert_eq!(h.manager.running_job_id(), Some(first));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancelled_task_is_discarded() {
        let mut h = Harness::new();
        let task_a = h.manager.enqueue(json!("A")).await.unwrap();
        let task_b = h.manager.enqueue(json!("B")).await.unwrap();
        let task_c = h.manager.enqueue(json!("C")).await.unwrap();
        h.manager.cancel(&task_b).await;

        let handle = h.spawn();
        h.gate.add_permits(3);

        assert_eq!(h.next_started().await, json!("A"));
        assert_eq!(h.next_started().await, json!("C"));
        h.wait_for(&task_c, JobStatus::Succeeded).await;

        assert_eq!(h.manager.status(&task_a).status(), Some(JobStatus::Succeeded));
        assert_eq!(h.manager.status(&task_b).status(), Some(JobStatus::Cancelled));
        assert_eq!(
            h.callback.statuses_for(&task_b),
            vec![JobStatus::Queued, JobStatus::Cancelled]
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_during_execution_is_overwritten_by_result() {
        let mut h = Harness::new();
        let task_a = h.manager.enqueue(json!({"name": "A"})).await.unwrap();

        let handle = h.spawn();
        assert_eq!(h.next_started().await, json!({"name": "A"}));

        h.manager.cancel(&task_a).await;
        assert_eq!(h.manager.status(&task_a).status(), Some(JobStatus::Cancelled));
        // 取消不会中断正在执行的任务
        assert_eq!(h.manager.running_job_id(), Some(task_a.clone()));

        h.gate.add_permits(1);
        h.wait_for(&task_a, JobStatus::Succeeded).await;

        let status = h.manager.status(&task_a);
        assert_eq!(status.result(), Some(&json!({"echo": {"name": "A"}})));
        assert_eq!(
            h.callback.statuses_for(&task_a),
            vec![
                JobStatus::Queued,
                JobStatus::Running,
                JobStatus::Cancelled,
                JobStatus::Succeeded
            ]
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_loop() {
        let mut h = Harness::new();
        let failing = h.manager.enqueue(json!({"fail": "voice missing"})).await.unwrap();
        let panicking = h.manager.enqueue(json!({"panic": true})).await.unwrap();
        let healthy = h.manager.enqueue(json!({"ok": true})).await.unwrap();

        let handle = h.spawn();
        h.gate.add_permits(3);
        h.wait_for(&healthy, JobStatus::Succeeded).await;

        let status = h.manager.status(&failing);
        assert_eq!(status.status(), Some(JobStatus::Failed));
        assert_eq!(status.error(), Some("voice missing"));
        assert_eq!(h.manager.status(&panicking).status(), Some(JobStatus::Failed));
        assert!(h.manager.running_job_id().is_none());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_while_idle() {
        let mut h = Harness::new();
        let handle = h.spawn();
        tokio::task::yield_now().await;

        handle.shutdown().await;

        // 接收端已随 Worker 释放
        let result = h.manager.enqueue(json!(null)).await;
        assert!(matches!(result, Err(QueueError::Closed)));
    }
}
