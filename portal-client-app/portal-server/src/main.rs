use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use portal_api::{build_router, cookie::SessionCookie, views::Pages, AppState};
use portal_core::repositories::{SessionStore, UserRepository};
use portal_core::services::AuthService;
use portal_infrastructure::{
    create_pool, run_migrations, InMemorySessionStore, InMemoryUserRepository, PgUserRepository,
    RedisSessionStore,
};
use portal_security::{Argon2Hasher, BcryptHasher, PasswordHasher};
use portal_shared::config::{
    AppConfig, DatabaseSettings, PasswordScheme, RedisSettings, SecuritySettings, SessionBackend,
    SessionSettings, UserStoreBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize telemetry; the guard flushes the file sink on exit
    let _log_guard = portal_shared::telemetry::init_telemetry(&config.log);

    info!("{} starting ({})", config.app.name, config.app.env);

    let hasher = password_hasher(&config.security);
    let users = user_repository(&config.database).await?;
    let sessions = session_store(&config.session, &config.redis)?;

    let ttl = Duration::from_secs(config.session.ttl_seconds);
    let auth = AuthService::new(users, sessions, hasher).with_session_ttl(ttl);

    let state = AppState {
        auth: Arc::new(auth),
        pages: Arc::new(Pages::new()?),
        cookie: Arc::new(SessionCookie::new(
            config.session.cookie_name.clone(),
            config.session.cookie_secure,
            ttl,
        )),
    };

    let app = build_router(state, &config.app.public_dir);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn password_hasher(settings: &SecuritySettings) -> Arc<dyn PasswordHasher> {
    match settings.password_scheme {
        PasswordScheme::Bcrypt => {
            info!("Password hashing: bcrypt (cost {})", settings.bcrypt_cost);
            Arc::new(BcryptHasher::new(settings.bcrypt_cost))
        }
        PasswordScheme::Argon2 => {
            info!("Password hashing: argon2id");
            Arc::new(Argon2Hasher)
        }
    }
}

async fn user_repository(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn UserRepository>> {
    match settings.backend {
        UserStoreBackend::Postgres => {
            info!("Connecting to database...");
            let pool =
                create_pool(&settings.url, settings.max_connections, settings.min_connections).await?;
            if settings.run_migrations {
                run_migrations(&pool).await?;
                info!("Database migrations applied");
            }
            info!("Database connection established");
            Ok(Arc::new(PgUserRepository::new(pool)))
        }
        UserStoreBackend::Memory => {
            warn!("Using in-memory user store; accounts are lost on restart");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}

fn session_store(
    settings: &SessionSettings,
    redis: &RedisSettings,
) -> anyhow::Result<Arc<dyn SessionStore>> {
    match settings.backend {
        SessionBackend::Redis => Ok(Arc::new(RedisSessionStore::new(
            &redis.url,
            redis.max_connections,
        )?)),
        SessionBackend::Memory => {
            let store = InMemorySessionStore::new();
            spawn_session_sweeper(
                store.clone(),
                Duration::from_secs(settings.cleanup_interval_seconds),
            );
            Ok(Arc::new(store))
        }
    }
}

/// Periodically drops expired in-memory sessions nobody reads again.
fn spawn_session_sweeper(store: InMemorySessionStore, interval: Duration) {
    if interval.is_zero() {
        warn!("Session sweep disabled; expired sessions are only dropped when read");
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            store.cleanup_expired();
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
