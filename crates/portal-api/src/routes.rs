use std::path::Path;

use axum::{handler::Handler, routing::get, Router};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{auth, health, pages};
use crate::state::AppState;

/// Full application router. Static files under `public_dir` are served for
/// any path no route claims; what they don't cover gets the 404 page.
pub fn build_router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    let not_found = pages::not_found.with_state(state.clone());
    let static_files = ServeDir::new(public_dir).not_found_service(not_found);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Pages
        .route("/", get(pages::home))
        .route("/members", get(pages::members))
        // Auth routes
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .fallback_service(static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};
    use portal_core::repositories::SessionStore;
    use portal_core::services::AuthService;
    use portal_core::{DomainError, SessionData, SessionId, SessionUser};
    use portal_infrastructure::{InMemorySessionStore, InMemoryUserRepository};
    use portal_security::BcryptHasher;
    use tower::ServiceExt;

    use super::*;
    use crate::cookie::SessionCookie;
    use crate::views::Pages;

    /// Session store whose backend is unreachable.
    struct UnreachableSessionStore;

    #[async_trait]
    impl SessionStore for UnreachableSessionStore {
        async fn create(&self, _: SessionUser, _: Duration) -> Result<SessionId, DomainError> {
            Err(DomainError::SessionStoreError("connection refused".into()))
        }

        async fn get(&self, _: &SessionId) -> Result<Option<SessionData>, DomainError> {
            Err(DomainError::SessionStoreError("connection refused".into()))
        }

        async fn destroy(&self, _: &SessionId) -> Result<(), DomainError> {
            Err(DomainError::SessionStoreError("connection refused".into()))
        }
    }

    fn app() -> Router {
        app_with(Arc::new(InMemorySessionStore::new()))
    }

    fn app_with(sessions: Arc<dyn SessionStore>) -> Router {
        let auth = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            sessions,
            Arc::new(BcryptHasher::new(4)),
        );
        let state = AppState {
            auth: Arc::new(auth),
            pages: Arc::new(Pages::new().unwrap()),
            cookie: Arc::new(SessionCookie::new("portal.sid", false, Duration::from_secs(3600))),
        };
        build_router(state, "does-not-exist")
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut request = Request::get(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.body(Body::empty()).unwrap()
    }

    /// `name=value` pair from the response's Set-Cookie header.
    fn session_cookie(response: &Response<Body>) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn body(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_signup_login_members_logout() {
        let app = app();

        let response = app
            .clone()
            .oneshot(form("/signup", "name=alice1&email=a%40example.com&password=secret1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/members");
        let cookie = session_cookie(&response);

        let response = app.clone().oneshot(get("/members", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("Hello, alice1."));
        assert!(html.contains(".svg"));

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert!(body(response).await.contains("Hello, alice1!"));

        let response = app.clone().oneshot(get("/logout", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(response.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

        let response = app.clone().oneshot(get("/members", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app
            .clone()
            .oneshot(form("/login", "email=a%40example.com&password=secret1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&response);
        let response = app.oneshot(get("/members", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_members_requires_session() {
        let response = app().oneshot(get("/members", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let forged = format!("portal.sid={}", "0".repeat(64));
        let response = app().oneshot(get("/members", Some(&forged))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_form_errors_rerender() {
        let app = app();

        let response = app.clone().oneshot(form("/signup", "name=alice1&email=")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body(response).await.contains("Please fill in all fields."));

        let response = app.clone().oneshot(form("/login", "email=a%40example.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body(response).await.contains("Please enter both email and password."));

        let response = app
            .clone()
            .oneshot(form("/signup", "name=a&email=a%40example.com&password=secret1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body(response).await.contains("length must be between 2 and 30"));

        app.clone()
            .oneshot(form("/signup", "name=alice1&email=a%40example.com&password=secret1"))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(form("/signup", "name=alice2&email=a%40example.com&password=secret1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(form("/login", "email=a%40example.com&password=wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body(response).await.contains("User and password not found."));
    }

    #[tokio::test]
    async fn test_form_without_content_type_counts_as_empty() {
        let request = Request::post("/signup").body(Body::from("name=alice1")).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body(response).await.contains("Please fill in all fields."));

        let request = Request::post("/login").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body(response).await.contains("Please enter both email and password."));
    }

    #[tokio::test]
    async fn test_login_replaces_presented_session() {
        let app = app();

        let response = app
            .clone()
            .oneshot(form("/signup", "name=alice1&email=a%40example.com&password=secret1"))
            .await
            .unwrap();
        let first = session_cookie(&response);

        let mut request = form("/login", "email=a%40example.com&password=secret1");
        request.headers_mut().insert(header::COOKIE, first.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let second = session_cookie(&response);
        assert_ne!(first, second);

        let response = app.clone().oneshot(get("/members", Some(&first))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let response = app.oneshot(get("/members", Some(&second))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_store_fault_is_500() {
        let app = app_with(Arc::new(UnreachableSessionStore));
        let cookie = format!("portal.sid={}", SessionId::generate().as_str());

        let response = app.clone().oneshot(get("/members", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body(response).await.contains("Something went wrong"));

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // Anonymous requests never reach the store.
        let response = app.oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_anonymous_home_and_forms() {
        let response = app().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("href=\"/signup\""));
        assert!(html.contains("href=\"/login\""));

        let response = app().oneshot(get("/signup", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app().oneshot(get("/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let response = app().oneshot(get("/logout", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = app().oneshot(get("/nope", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(response).await.contains("Page not found."));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains("\"healthy\""));
    }
}
