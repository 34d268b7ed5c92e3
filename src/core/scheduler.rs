// ============================================================================
// CapsFix - 异步任务调度器
// ============================================================================
//
// 文件: src/core/scheduler.rs
// 职责: 通用异步任务调度和并发控制
// 边界:
//   - ✅ 异步任务调度和执行
//   - ✅ 并发数量控制
//   - ✅ 任务超时管理
//   - ✅ 失败即停 (fail fast)
//   - ✅ 执行结果聚合与进度回调
//   - ❌ 不包含具体业务逻辑
//   - ❌ 不包含 UI 显示逻辑
//   - ❌ 不包含配置管理
//
// ============================================================================

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// 任务执行结果
#[derive(Debug, Clone)]
pub enum TaskResult<T, E = String> {
    /// 任务执行成功
    Success(T),
    /// 任务执行失败
    Failed(E),
    /// 任务执行超时
    Timeout,
    /// 任务被取消
    Cancelled,
}

impl<T, E> TaskResult<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }
}

/// 进度回调函数类型 (completed, total)
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// 调度器配置
#[derive(Clone)]
pub struct SchedulerConfig {
    /// 最大并发任务数
    pub max_concurrency: usize,
    /// 任务超时时长（None 表示不限制）
    pub timeout: Option<Duration>,
    /// 是否在第一个任务失败时停止所有任务
    pub fail_fast: bool,
    /// 进度回调函数 (completed, total)
    pub progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("max_concurrency", &self.max_concurrency)
            .field("timeout", &self.timeout)
            .field("fail_fast", &self.fail_fast)
            .field("has_progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get(),
            timeout: None,
            fail_fast: false,
            progress_callback: None,
        }
    }
}

/// 批次执行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    pub successful: usize,
    pub failed: usize,
}

/// 异步任务调度器
pub struct AsyncTaskScheduler {
    /// 调度器配置
    config: SchedulerConfig,
    /// 并发控制信号量
    semaphore: Arc<Semaphore>,
    /// 是否应该停止执行
    should_stop: Arc<AtomicBool>,
    /// 本批次任务总数
    total_count: Arc<AtomicUsize>,
    /// 已完成任务计数
    completed_count: Arc<AtomicUsize>,
    /// 成功任务计数
    successful_count: Arc<AtomicUsize>,
    /// 失败任务计数
    failed_count: Arc<AtomicUsize>,
}

impl AsyncTaskScheduler {
    /// 创建新的调度器
    pub fn new(config: SchedulerConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));

        Self {
            config,
            semaphore,
            should_stop: Arc::new(AtomicBool::new(false)),
            total_count: Arc::new(AtomicUsize::new(0)),
            completed_count: Arc::new(AtomicUsize::new(0)),
            successful_count: Arc::new(AtomicUsize::new(0)),
            failed_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 执行单个异步任务
    pub async fn execute_task<T, E, F>(&self, task_id: &str, task: F) -> TaskResult<T, E>
    where
        T: Send + 'static,
        E: Display + Send + 'static,
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        // 检查是否应该停止
        if self.should_stop.load(Ordering::SeqCst) {
            return TaskResult::Cancelled;
        }

        // 获取信号量许可
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => return TaskResult::Cancelled,
        };

        // 等待许可期间其他任务可能已经失败
        if self.should_stop.load(Ordering::SeqCst) {
            return TaskResult::Cancelled;
        }

        let start_time = Instant::now();
        tracing::debug!(task = task_id, "task started");

        // 执行任务（可能有超时）
        let result = match self.config.timeout {
            Some(timeout_duration) => match timeout(timeout_duration, task).await {
                Ok(Ok(value)) => TaskResult::Success(value),
                Ok(Err(e)) => TaskResult::Failed(e),
                Err(_) => TaskResult::Timeout,
            },
            None => match task.await {
                Ok(value) => TaskResult::Success(value),
                Err(e) => TaskResult::Failed(e),
            },
        };

        let is_success = result.is_success();
        self.update_counters_and_progress(is_success);

        // 如果配置了 fail_fast 且任务失败，则停止所有其他任务
        if self.config.fail_fast && !is_success {
            self.should_stop.store(true, Ordering::SeqCst);
            tracing::debug!(task = task_id, "fail fast triggered, cancelling remaining tasks");
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        match &result {
            TaskResult::Success(_) => tracing::debug!(task = task_id, elapsed, "task succeeded"),
            TaskResult::Failed(err) => {
                tracing::debug!(task = task_id, elapsed, error = %err, "task failed")
            }
            TaskResult::Timeout => tracing::warn!(task = task_id, elapsed, "task timed out"),
            TaskResult::Cancelled => tracing::debug!(task = task_id, "task cancelled"),
        }

        result
    }

    /// 并发执行多个任务，结果顺序与输入顺序一致
    pub async fn execute_batch<T, E, F>(&self, tasks: Vec<(String, F)>) -> Vec<(String, TaskResult<T, E>)>
    where
        T: Send + 'static,
        E: Display + Send + 'static,
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        if tasks.is_empty() {
            return Vec::new();
        }

        tracing::debug!(tasks = tasks.len(), "batch started");

        // 重置停止标志和计数器
        self.should_stop.store(false, Ordering::SeqCst);
        self.total_count.store(tasks.len(), Ordering::SeqCst);
        self.completed_count.store(0, Ordering::SeqCst);
        self.successful_count.store(0, Ordering::SeqCst);
        self.failed_count.store(0, Ordering::SeqCst);

        // 创建任务句柄
        let mut handles: Vec<(String, JoinHandle<TaskResult<T, E>>)> = Vec::new();

        for (task_id, task) in tasks {
            let scheduler = self.clone_for_task();
            let id = task_id.clone();
            let handle = tokio::spawn(async move { scheduler.execute_task(&id, task).await });
            handles.push((task_id, handle));
        }

        // 等待所有任务完成
        let mut results = Vec::with_capacity(handles.len());
        for (task_id, handle) in handles {
            match handle.await {
                Ok(result) => results.push((task_id, result)),
                Err(e) => {
                    tracing::error!(task = %task_id, error = %e, "task could not be joined");
                    results.push((task_id, TaskResult::Cancelled));
                }
            }
        }

        let progress = self.progress();
        tracing::debug!(
            successful = progress.successful,
            total = progress.total,
            "batch completed"
        );

        results
    }

    /// 获取当前执行进度
    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            total: self.total_count.load(Ordering::SeqCst),
            completed: self.completed_count.load(Ordering::SeqCst),
            successful: self.successful_count.load(Ordering::SeqCst),
            failed: self.failed_count.load(Ordering::SeqCst),
        }
    }

    /// 设置进度回调函数
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// 更新计数器并调用进度回调
    fn update_counters_and_progress(&self, is_success: bool) {
        let completed = self.completed_count.fetch_add(1, Ordering::SeqCst) + 1;

        if is_success {
            self.successful_count.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failed_count.fetch_add(1, Ordering::SeqCst);
        }

        if let Some(callback) = &self.config.progress_callback {
            callback(completed, self.total_count.load(Ordering::SeqCst));
        }
    }

    /// 为任务执行创建调度器克隆
    fn clone_for_task(&self) -> Self {
        Self {
            config: self.config.clone(),
            semaphore: Arc::clone(&self.semaphore),
            should_stop: Arc::clone(&self.should_stop),
            total_count: Arc::clone(&self.total_count),
            completed_count: Arc::clone(&self.completed_count),
            successful_count: Arc::clone(&self.successful_count),
            failed_count: Arc::clone(&self.failed_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type BoxedTask = std::pin::Pin<Box<dyn Future<Output = Result<usize, String>> + Send>>;

    fn task(value: usize, delay_ms: u64) -> BoxedTask {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(value)
        })
    }

    fn failing(message: &'static str) -> BoxedTask {
        Box::pin(async move { Err(message.to_string()) })
    }

    #[tokio::test]
    async fn results_keep_input_order() {
        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            max_concurrency: 2,
            ..SchedulerConfig::default()
        });
        let tasks = vec![
            ("a".to_string(), task(1, 30)),
            ("b".to_string(), task(2, 0)),
            ("c".to_string(), task(3, 10)),
        ];

        let results = scheduler.execute_batch(tasks).await;
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(results.iter().all(|(_, r)| r.is_success()));
        assert_eq!(
            scheduler.progress(),
            BatchProgress {
                total: 3,
                completed: 3,
                successful: 3,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn fail_fast_cancels_waiting_tasks() {
        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            max_concurrency: 1,
            fail_fast: true,
            ..SchedulerConfig::default()
        });
        let tasks = vec![
            ("bad".to_string(), failing("boom")),
            ("later".to_string(), task(1, 0)),
        ];

        let results = scheduler.execute_batch(tasks).await;
        assert!(matches!(&results[0].1, TaskResult::Failed(message) if message == "boom"));
        assert!(matches!(results[1].1, TaskResult::Cancelled));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            timeout: Some(Duration::from_millis(10)),
            ..SchedulerConfig::default()
        });
        let results = scheduler
            .execute_batch(vec![("slow".to_string(), task(1, 1_000))])
            .await;
        assert!(matches!(results[0].1, TaskResult::Timeout));
    }

    #[tokio::test]
    async fn progress_callback_sees_every_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            max_concurrency: 1,
            ..SchedulerConfig::default()
        })
        .with_progress_callback(Arc::new(move |completed, total| {
            sink.lock().unwrap().push((completed, total));
        }));

        scheduler
            .execute_batch(vec![("a".to_string(), task(1, 0)), ("b".to_string(), task(2, 0))])
            .await;
        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }
}
