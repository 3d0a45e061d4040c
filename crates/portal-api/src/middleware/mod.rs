//! Request extractors for the session gate

pub mod session;

pub use session::{CurrentSession, MaybeUser};
