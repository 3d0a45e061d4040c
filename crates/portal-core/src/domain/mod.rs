//! # Portal Core - Domain Module
//! 
//! Domain entities for the member portal.

pub mod user;
pub mod session;

pub use user::User;
pub use session::{AuthSession, SessionData, SessionUser};
