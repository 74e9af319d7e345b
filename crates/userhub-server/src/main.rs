use std::sync::Arc;

use userhub_auth::{AuthService, AuthState, TokenService};
use userhub_postgres::{PostgresUserStorage, create_pool, ensure_schema};
use userhub_server::users::UserService;
use userhub_server::{AppConfig, AppState, CacheBackend, build_router};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else).
    // This allows environment variables to be set from .env for local development.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    userhub_server::observability::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(env = %config.env, "Configuration loaded");

    // Persistent store
    let pool = match create_pool(&config.database.url, config.database.pool_size).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Database connection failed: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = ensure_schema(&pool).await {
        eprintln!("Schema bootstrap failed: {e}");
        std::process::exit(2);
    }
    let storage = Arc::new(PostgresUserStorage::new(pool));

    // Cache backend: Redis when configured, local-only otherwise (test mode)
    let cache = match config.redis.url() {
        Some(url) => match deadpool_redis::Config::from_url(url.clone())
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        {
            Ok(pool) => {
                tracing::info!(url = %url, "Redis cache enabled");
                CacheBackend::new_redis(pool)
            }
            Err(e) => {
                eprintln!("Redis pool creation failed: {e}");
                std::process::exit(2);
            }
        },
        None => {
            tracing::info!("Redis not configured; using local cache only");
            CacheBackend::new_local()
        }
    };

    // Services
    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.jwt_expiration);
    let auth = Arc::new(AuthService::new(storage.clone(), tokens));
    let users = Arc::new(UserService::new(storage, cache, config.cache.ttl));
    let state = AppState::new(users, AuthState::new(auth));

    let app = build_router(state);

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        addr = %addr,
        env = %config.env,
        "userhub server listening"
    );

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {e}");
    }
}
