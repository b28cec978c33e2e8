//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mediajob_core::error::AppError;
use mediajob_core::result::AppResult;

use super::kind::JobType;

/// Retry budget used when the caller does not supply one.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Caller-supplied job attributes.
///
/// This is both the construction input and the serialized representation
/// stored in queues: exactly `{type, notification_url, retries, reference, params}`.
/// Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobAttributes {
    /// Job type string. Kept verbatim; validity is checked separately.
    #[serde(rename = "type", default)]
    pub job_type: String,
    /// Webhook receiving lifecycle notifications.
    #[serde(default)]
    pub notification_url: Option<String>,
    /// Retry budget. Falls back to [`DEFAULT_MAX_RETRIES`].
    #[serde(default)]
    pub retries: Option<u32>,
    /// Correlation value merged into every notification.
    #[serde(default)]
    pub reference: Option<Value>,
    /// Processor parameters, passed through untouched.
    #[serde(default)]
    pub params: Value,
}

/// One unit of requested media-processing work.
///
/// Two jobs are equal when their type, notification URL, remaining
/// retries, reference, and params are equal; `created_at` is ignored.
#[derive(Debug, Clone)]
pub struct Job {
    job_type: String,
    notification_url: Option<String>,
    retries_left: u32,
    reference: Option<Value>,
    params: Value,
    created_at: DateTime<Utc>,
}

impl Job {
    /// Build a job from attributes. Never fails, even for an unknown type.
    pub fn new(attributes: JobAttributes) -> Self {
        Self {
            job_type: attributes.job_type,
            notification_url: attributes.notification_url,
            retries_left: attributes.retries.unwrap_or(DEFAULT_MAX_RETRIES),
            reference: attributes.reference,
            params: attributes.params,
            created_at: Utc::now(),
        }
    }

    /// Build a job from a JSON attribute object.
    pub fn from_value(value: Value) -> AppResult<Self> {
        let attributes: JobAttributes = serde_json::from_value(value)
            .map_err(|e| AppError::validation(format!("Invalid job attributes: {e}")))?;
        Ok(Self::new(attributes))
    }

    /// Build a job from its serialized JSON text.
    pub fn from_json(data: &str) -> AppResult<Self> {
        let attributes: JobAttributes = serde_json::from_str(data)
            .map_err(|e| AppError::validation(format!("Invalid job attributes: {e}")))?;
        Ok(Self::new(attributes))
    }

    /// Serialize the job's attributes to JSON text.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(&self.attributes())?)
    }

    /// Current attribute set. `retries` reflects the remaining budget.
    pub fn attributes(&self) -> JobAttributes {
        JobAttributes {
            job_type: self.job_type.clone(),
            notification_url: self.notification_url.clone(),
            retries: Some(self.retries_left),
            reference: self.reference.clone(),
            params: self.params.clone(),
        }
    }

    /// Whether the type is one of the known job types.
    pub fn is_valid(&self) -> bool {
        self.job_type().is_ok()
    }

    /// Parsed job type.
    pub fn job_type(&self) -> AppResult<JobType> {
        self.job_type.parse()
    }

    /// Raw job type string as supplied by the caller.
    pub fn job_type_str(&self) -> &str {
        &self.job_type
    }

    /// Remaining retry budget.
    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }

    /// Spend one retry. Returns `false` and leaves the budget untouched when
    /// none is left.
    pub fn consume_retry(&mut self) -> bool {
        match self.retries_left.checked_sub(1) {
            Some(left) => {
                self.retries_left = left;
                true
            }
            None => false,
        }
    }

    /// Webhook URL, if any.
    pub fn notification_url(&self) -> Option<&str> {
        self.notification_url.as_deref()
    }

    /// Correlation reference, if any.
    pub fn reference(&self) -> Option<&Value> {
        self.reference.as_ref()
    }

    /// Processor parameters.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// When the job was constructed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<JobAttributes> for Job {
    fn from(attributes: JobAttributes) -> Self {
        Self::new(attributes)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.job_type == other.job_type
            && self.notification_url == other.notification_url
            && self.retries_left == other.retries_left
            && self.reference == other.reference
            && self.params == other.params
    }
}

impl Eq for Job {}
