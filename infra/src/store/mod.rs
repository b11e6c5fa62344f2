//! Property store backends
//!
//! One [`mf_core::services::provider::PropertyStore`] record per user, with
//! the provider identifier baked into the store instance.

pub mod memory;
pub mod redis_store;

pub use memory::InMemoryPropertyStore;
pub use redis_store::RedisPropertyStore;
