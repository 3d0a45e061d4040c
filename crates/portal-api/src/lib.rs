//! # Portal API
//! 
//! HTTP handlers, session cookie, extractors, and server-rendered pages.

pub mod cookie;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod views;

pub use routes::build_router;
pub use state::AppState;
