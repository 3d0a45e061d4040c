//! Server-rendered pages (handlebars templates embedded at build time)

use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

const PARTIALS: [(&str, &str); 2] = [
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Signup,
    Login,
    Members,
    NotFound,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Home, Page::Signup, Page::Login, Page::Members, Page::NotFound];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Signup => "signup",
            Page::Login => "login",
            Page::Members => "members",
            Page::NotFound => "404",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Page::Home => include_str!("../templates/home.hbs"),
            Page::Signup => include_str!("../templates/signup.hbs"),
            Page::Login => include_str!("../templates/login.hbs"),
            Page::Members => include_str!("../templates/members.hbs"),
            Page::NotFound => include_str!("../templates/404.hbs"),
        }
    }
}

pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, ApiError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry
                .register_partial(name, source)
                .map_err(|e| ApiError::TemplateError(e.to_string()))?;
        }
        for page in Page::ALL {
            registry
                .register_template_string(page.name(), page.source())
                .map_err(|e| ApiError::TemplateError(e.to_string()))?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, page: Page, data: &T) -> Result<Html<String>, ApiError> {
        self.registry
            .render(page.name(), data)
            .map(Html)
            .map_err(|e| ApiError::TemplateError(e.to_string()))
    }

    /// Signup and login forms, optionally with the message from the last attempt.
    pub fn form(&self, page: Page, error: Option<&str>) -> Result<Html<String>, ApiError> {
        self.render(page, &json!({ "error": error }))
    }
}
