//! Domain model for media processing jobs.

pub mod job;

pub use job::{AttemptState, Job, JobAttributes, JobType};
