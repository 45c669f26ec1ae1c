//! In-Memory Task Queue
//!
//! 无界 FIFO 通道。接收端不可 Clone，只能有一个消费者。

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::ports::QueueError;

/// 队列中的任务
#[derive(Debug, Clone)]
pub struct TaskEnvelope {
    pub id: String,
    pub payload: Value,
    pub enqueued_at: DateTime<Utc>,
}

impl TaskEnvelope {
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            payload,
            enqueued_at: Utc::now(),
        }
    }
}

/// 创建任务队列，返回发送端和唯一的接收端
pub fn task_queue() -> (TaskQueueSender, TaskQueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let pending = Arc::new(AtomicUsize::new(0));
    (
        TaskQueueSender {
            tx,
            pending: pending.clone(),
        },
        TaskQueueReceiver { rx, pending },
    )
}

/// 队列发送端
pub struct TaskQueueSender {
    tx: mpsc::UnboundedSender<TaskEnvelope>,
    pending: Arc<AtomicUsize>,
}

impl TaskQueueSender {
    /// 追加到队尾
    pub fn push(&self, task: TaskEnvelope) -> Result<(), QueueError> {
        // 先计数再发送，保证接收端的递减不会早于递增
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(task).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueError::Closed);
        }
        Ok(())
    }

    /// 尚未出队的任务数
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 队列接收端
pub struct TaskQueueReceiver {
    rx: mpsc::UnboundedReceiver<TaskEnvelope>,
    pending: Arc<AtomicUsize>,
}

impl TaskQueueReceiver {
    /// 等待下一个任务，所有发送端关闭后返回 None
    pub async fn recv(&mut self) -> Option<TaskEnvelope> {
        let task = self.rx.recv().await?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(task)
    }
}
