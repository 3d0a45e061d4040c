//! # Portal Infrastructure
//! 
//! Database, cache, and in-memory implementations (adapters).

pub mod database;
pub mod cache;
pub mod memory;

pub use database::{create_pool, run_migrations, PgUserRepository};
pub use cache::RedisSessionStore;
pub use memory::{InMemorySessionStore, InMemoryUserRepository};
