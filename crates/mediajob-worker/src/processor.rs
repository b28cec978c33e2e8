//! Processor capability and the static registry that maps job types to
//! processor constructors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use mediajob_core::error::AppError;
use mediajob_entity::JobType;

/// Receives progress updates from a running processor.
#[async_trait]
pub trait ProgressReporter: Send {
    /// Report progress. Payload fields are owned by the processor.
    async fn report(&mut self, progress: Map<String, Value>);
}

/// A type-specific unit of media work.
#[async_trait]
pub trait Processor: Send {
    /// Run the work, calling `progress` any number of times. Returns an
    /// optional result payload merged into the `completed` notification.
    async fn execute(
        &mut self,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Option<Map<String, Value>>, ProcessorError>;
}

/// Error from processor resolution or execution
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// Processing was interrupted; never retried
    #[error("Cancelled")]
    Cancelled,

    /// The job type string is not a known type
    #[error("Unknown job type '{0}'")]
    UnknownType(String),

    /// The job type is known but no processor was registered for it
    #[error("No processor registered for job type '{0}'")]
    NotRegistered(JobType),

    /// Params could not be interpreted by the processor
    #[error("Invalid processor params: {0}")]
    InvalidParams(String),

    /// Processing failed
    #[error("{0}")]
    Failed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error(transparent)]
    App(#[from] AppError),
}

/// Builds a processor from a job's params.
pub type ProcessorFactory =
    Arc<dyn Fn(&Value) -> Result<Box<dyn Processor>, ProcessorError> + Send + Sync>;

/// Maps each job type to the constructor of its processor
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    /// Registered constructors by type
    factories: HashMap<JobType, ProcessorFactory>,
}

impl ProcessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for a job type, replacing any previous one
    pub fn register<F>(&mut self, job_type: JobType, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Processor>, ProcessorError> + Send + Sync + 'static,
    {
        tracing::info!("Registered processor for job type '{}'", job_type);
        self.factories.insert(job_type, Arc::new(factory));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(mut self, job_type: JobType, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<Box<dyn Processor>, ProcessorError> + Send + Sync + 'static,
    {
        self.register(job_type, factory);
        self
    }

    /// Check if a processor is registered for a job type
    pub fn has_processor(&self, job_type: JobType) -> bool {
        self.factories.contains_key(&job_type)
    }

    /// Get the registered job types
    pub fn registered_types(&self) -> Vec<JobType> {
        JobType::ALL
            .into_iter()
            .filter(|kind| self.factories.contains_key(kind))
            .collect()
    }

    /// Construct the processor for `job_type` from `params`
    pub fn resolve(
        &self,
        job_type: &str,
        params: &Value,
    ) -> Result<Box<dyn Processor>, ProcessorError> {
        let kind: JobType = job_type
            .parse()
            .map_err(|_| ProcessorError::UnknownType(job_type.to_string()))?;

        let factory = self
            .factories
            .get(&kind)
            .ok_or(ProcessorError::NotRegistered(kind))?;

        factory(params)
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("registered", &self.registered_types())
            .finish()
    }
}
