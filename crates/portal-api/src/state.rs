use std::sync::Arc;

use portal_core::services::AuthService;

use crate::cookie::SessionCookie;
use crate::views::Pages;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub pages: Arc<Pages>,
    pub cookie: Arc<SessionCookie>,
}
