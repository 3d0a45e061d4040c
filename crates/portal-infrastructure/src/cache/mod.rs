//! Cache module (Redis adapters)

pub mod redis_session_store;

pub use redis_session_store::RedisSessionStore;
