//! Shared harness for integration tests: boots the full router against the
//! in-memory storage and a local cache, on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use userhub_auth::{AuthService, AuthState, TokenService};
use userhub_server::users::UserService;
use userhub_server::{AppState, CacheBackend, build_router};
use userhub_storage::MemoryUserStorage;

pub struct TestServer {
    pub base: String,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let storage = Arc::new(MemoryUserStorage::new());
        let tokens = TokenService::new("integration-test-secret", Duration::from_secs(3600));
        let auth = Arc::new(AuthService::new(storage.clone(), tokens));
        let users = Arc::new(UserService::new(
            storage,
            CacheBackend::new_local(),
            Duration::from_secs(120),
        ));
        let state = AppState::new(users, AuthState::new(auth));
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind");
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            base: format!("http://{addr}"),
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

/// Registers a user and returns (access_token, user json).
pub async fn register(
    client: &reqwest::Client,
    base: &str,
    name: &str,
    email: &str,
    password: &str,
) -> (String, serde_json::Value) {
    let resp = client
        .post(format!("{base}/auth/register"))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201, "register should succeed");

    let body: serde_json::Value = resp.json().await.unwrap();
    let token = body["access_token"].as_str().unwrap().to_string();
    (token, body["user"].clone())
}
