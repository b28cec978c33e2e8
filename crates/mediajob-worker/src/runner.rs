//! Job runner: drives a single job through start → process → notify, retrying
//! failed attempts until the job's retry budget is spent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use mediajob_core::config::WorkerConfig;
use mediajob_core::traits::DiagnosticsSink;
use mediajob_entity::{AttemptState, Job};

use crate::notification::Notification;
use crate::notifier::{NotificationTarget, Notifier};
use crate::processor::{ProcessorError, ProcessorRegistry, ProgressReporter};
use crate::throttle::ProgressThrottle;

/// Timing knobs of the execute loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Minimum spacing between progress notifications.
    pub progress_interval: Duration,
    /// Pause before retrying a failed attempt.
    pub retry_delay: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_secs(10),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&WorkerConfig> for RunnerSettings {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            progress_interval: config.progress_interval(),
            retry_delay: config.retry_delay(),
        }
    }
}

/// Returned by [`JobRunner::execute`] when the job was cancelled. The only
/// failure that escapes the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Job was cancelled")]
pub struct JobCancelled;

/// Executes jobs against a processor registry, reporting every lifecycle
/// step through the notifier.
#[derive(Debug, Clone)]
pub struct JobRunner {
    /// Processor constructors by job type
    registry: Arc<ProcessorRegistry>,
    /// Lifecycle notification delivery
    notifier: Notifier,
    /// Receives absorbed job failures
    diagnostics: Arc<dyn DiagnosticsSink>,
    /// Retry and throttle timing
    settings: RunnerSettings,
}

impl JobRunner {
    /// Create a new job runner
    pub fn new(
        registry: Arc<ProcessorRegistry>,
        notifier: Notifier,
        diagnostics: Arc<dyn DiagnosticsSink>,
        settings: RunnerSettings,
    ) -> Self {
        Self {
            registry,
            notifier,
            diagnostics,
            settings,
        }
    }

    /// Timing settings in effect.
    pub fn settings(&self) -> RunnerSettings {
        self.settings
    }

    /// Run `job` to completion.
    ///
    /// Failures other than cancellation are retried while the job has retry
    /// budget and then absorbed: the outcome is visible only through the
    /// notifications. Cancellation emits a final `failed` notification and
    /// returns [`JobCancelled`].
    #[instrument(skip_all, fields(job_type = %job.job_type_str()))]
    pub async fn execute(
        &self,
        job: &mut Job,
        cancel: &CancellationToken,
    ) -> Result<(), JobCancelled> {
        info!(
            state = %AttemptState::Pending,
            attributes = ?job.attributes(),
            "Begin processing job"
        );

        loop {
            debug!(
                state = %AttemptState::Started,
                retries_left = job.retries_left(),
                "Attempt started"
            );
            self.notifier
                .deliver(&NotificationTarget::from(&*job), Notification::started())
                .await;

            let started_at = Instant::now();
            let outcome = self.run_attempt(job, cancel).await;
            let time_taken = started_at.elapsed();

            let err = match outcome {
                Ok(result) => {
                    self.notifier
                        .deliver(
                            &NotificationTarget::from(&*job),
                            Notification::completed(time_taken.as_secs_f64(), result),
                        )
                        .await;
                    info!(
                        state = %AttemptState::Succeeded,
                        time_taken_secs = time_taken.as_secs_f64(),
                        "Completed job"
                    );
                    return Ok(());
                }
                Err(ProcessorError::Cancelled) => return self.cancelled(job).await,
                Err(err) => err,
            };

            self.diagnostics
                .report_exception(&err, "Job failed with exception");
            let reason = err.to_string();

            if !job.consume_retry() {
                error!(
                    state = %AttemptState::FailedTerminal,
                    reason = %reason,
                    "No more retries for job, marking as failed"
                );
                self.notifier
                    .deliver(&NotificationTarget::from(&*job), Notification::failed(reason))
                    .await;
                return Ok(());
            }

            warn!(
                state = %AttemptState::FailedRetryable,
                retries_left = job.retries_left(),
                reason = %reason,
                "Job attempt failed"
            );
            self.notifier
                .deliver(
                    &NotificationTarget::from(&*job),
                    Notification::failed_will_retry(reason),
                )
                .await;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(job).await,
                _ = time::sleep(self.settings.retry_delay) => {}
            }
            info!("Retrying job");
        }
    }

    /// Resolve and run the processor once, racing it against cancellation.
    async fn run_attempt(
        &self,
        job: &Job,
        cancel: &CancellationToken,
    ) -> Result<Option<Map<String, Value>>, ProcessorError> {
        let mut reporter = ThrottledProgress {
            notifier: &self.notifier,
            target: NotificationTarget::from(job),
            throttle: ProgressThrottle::new(self.settings.progress_interval),
        };

        let mut processor = self.registry.resolve(job.job_type_str(), job.params())?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProcessorError::Cancelled),
            result = processor.execute(&mut reporter) => result,
        }
    }

    async fn cancelled(&self, job: &Job) -> Result<(), JobCancelled> {
        error!(state = %AttemptState::Cancelled, "Job interrupted");
        self.notifier
            .deliver(&NotificationTarget::from(job), Notification::cancelled())
            .await;
        Err(JobCancelled)
    }
}

/// Progress sink handed to processors; forwards at most one update per
/// throttle window and drops the rest.
struct ThrottledProgress<'a> {
    notifier: &'a Notifier,
    target: NotificationTarget<'a>,
    throttle: ProgressThrottle,
}

#[async_trait]
impl ProgressReporter for ThrottledProgress<'_> {
    async fn report(&mut self, progress: Map<String, Value>) {
        if self.throttle.try_acquire() {
            self.notifier
                .deliver(&self.target, Notification::progress(progress))
                .await;
        }
    }
}
