//! Fallback publish channels for job notifications.

pub mod memory;
#[cfg(feature = "redis-pubsub")]
pub mod redis;

pub use memory::MemoryPublisher;
#[cfg(feature = "redis-pubsub")]
pub use self::redis::RedisPublisher;
