//! Media job entities.

pub mod kind;
pub mod model;
pub mod status;

pub use kind::JobType;
pub use model::{DEFAULT_MAX_RETRIES, Job, JobAttributes};
pub use status::AttemptState;
