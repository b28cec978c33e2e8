//! Shared test helpers for runner and notifier integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use mediajob_core::error::AppError;
use mediajob_core::result::AppResult;
use mediajob_core::traits::{DiagnosticsSink, NotificationPublisher};
use mediajob_entity::{Job, JobType};
use mediajob_worker::{
    JobRunner, Notifier, Processor, ProcessorError, ProcessorRegistry, ProgressReporter,
    RunnerSettings, WebhookSender,
};

/// Webhook sender that records `(url, body)` instead of sending.
#[derive(Debug, Default)]
pub struct RecordingWebhook {
    posts: Mutex<Vec<(String, Value)>>,
    fail: AtomicBool,
}

impl RecordingWebhook {
    pub fn failing() -> Self {
        let webhook = Self::default();
        webhook.fail.store(true, Ordering::SeqCst);
        webhook
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<Value> {
        self.posts().into_iter().map(|(_, body)| body).collect()
    }
}

#[async_trait]
impl WebhookSender for RecordingWebhook {
    async fn post_json(&self, url: &str, body: String) -> AppResult<()> {
        let body: Value = serde_json::from_str(&body)?;
        self.posts.lock().unwrap().push((url.to_string(), body));
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::external_service("connection refused"));
        }
        Ok(())
    }
}

/// Publisher that records every message.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<Map<String, Value>>>,
    fail: AtomicBool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.fail.store(true, Ordering::SeqCst);
        publisher
    }

    pub fn messages(&self) -> Vec<Value> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(Value::Object)
            .collect()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, message: &Map<String, Value>) -> AppResult<()> {
        self.messages.lock().unwrap().push(message.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("bus offline"));
        }
        Ok(())
    }
}

/// Diagnostics sink that records `(context, error)` pairs.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.reports().into_iter().map(|(context, _)| context).collect()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn report_exception(&self, error: &(dyn Error + 'static), context: &str) {
        self.reports
            .lock()
            .unwrap()
            .push((context.to_string(), error.to_string()));
    }
}

/// What a scripted processor does on one attempt.
#[derive(Debug, Clone)]
pub enum Step {
    /// Return `ProcessorError::Failed` with this message.
    Fail(&'static str),
    /// Return this result payload.
    Succeed(Option<Value>),
    /// Return `ProcessorError::Cancelled`.
    Cancel,
    /// Report `{"tick": n}` every `every`, `count` times, then succeed.
    Progress { every: Duration, count: usize },
    /// Never finish.
    Hang,
}

/// Attempt script shared by every processor built from a registry.
#[derive(Debug, Default)]
pub struct Script {
    steps: Mutex<VecDeque<Step>>,
    attempts: AtomicUsize,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            attempts: AtomicUsize::new(0),
        })
    }

    /// Number of processors constructed so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Step {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Succeed(None))
    }
}

struct ScriptedProcessor {
    step: Step,
}

#[async_trait]
impl Processor for ScriptedProcessor {
    async fn execute(
        &mut self,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Option<Map<String, Value>>, ProcessorError> {
        match self.step.clone() {
            Step::Fail(message) => Err(ProcessorError::Failed(message.to_string())),
            Step::Succeed(result) => Ok(result.and_then(|v| v.as_object().cloned())),
            Step::Cancel => Err(ProcessorError::Cancelled),
            Step::Progress { every, count } => {
                for tick in 1..=count {
                    tokio::time::sleep(every).await;
                    let mut payload = Map::new();
                    payload.insert("tick".to_string(), Value::from(tick));
                    progress.report(payload).await;
                }
                Ok(None)
            }
            Step::Hang => {
                std::future::pending::<()>().await;
                Ok(None)
            }
        }
    }
}

/// Registry whose processors for every job type follow `script`.
pub fn scripted_registry(script: &Arc<Script>) -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    for kind in JobType::ALL {
        let script = Arc::clone(script);
        registry.register(kind, move |_params| {
            Ok(Box::new(ScriptedProcessor {
                step: script.next_step(),
            }) as Box<dyn Processor>)
        });
    }
    registry
}

/// Recording collaborators wired into a runner.
pub struct Harness {
    pub webhook: Arc<RecordingWebhook>,
    pub publisher: Arc<RecordingPublisher>,
    pub diagnostics: Arc<RecordingDiagnostics>,
    pub script: Arc<Script>,
    with_fallback: bool,
}

impl Harness {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            webhook: Arc::new(RecordingWebhook::default()),
            publisher: Arc::new(RecordingPublisher::default()),
            diagnostics: Arc::new(RecordingDiagnostics::default()),
            script: Script::new(steps),
            with_fallback: true,
        }
    }

    pub fn with_webhook(mut self, webhook: RecordingWebhook) -> Self {
        self.webhook = Arc::new(webhook);
        self
    }

    pub fn with_publisher(mut self, publisher: RecordingPublisher) -> Self {
        self.publisher = Arc::new(publisher);
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.with_fallback = false;
        self
    }

    pub fn notifier(&self) -> Notifier {
        let fallback: Option<Arc<dyn NotificationPublisher>> = if self.with_fallback {
            Some(self.publisher.clone() as Arc<dyn NotificationPublisher>)
        } else {
            None
        };
        Notifier::new(self.webhook.clone(), fallback, self.diagnostics.clone())
    }

    pub fn runner(&self) -> JobRunner {
        JobRunner::new(
            Arc::new(scripted_registry(&self.script)),
            self.notifier(),
            self.diagnostics.clone(),
            RunnerSettings::default(),
        )
    }
}

/// Build a job from a JSON attribute object.
pub fn job(attributes: Value) -> Job {
    Job::from_value(attributes).expect("valid job attributes")
}

/// The `event` field of each message.
pub fn events(messages: &[Value]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m["event"].as_str().unwrap_or_default().to_string())
        .collect()
}
