//! In-memory adapters for single-process deployments and tests

pub mod session_store;
pub mod user_repo;

pub use session_store::InMemorySessionStore;
pub use user_repo::InMemoryUserRepository;
