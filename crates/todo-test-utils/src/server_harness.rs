//! Test server harness for E2E testing
//!
//! Provides TestTodoServer for spawning real todo server instances in tests.
//! Each instance runs on its own in-memory store and mock clock, so tests are
//! isolated and can move time forward without sleeping.

use crate::crypto_fixtures::test_auth_settings;
use common::clock::mock::MockClock;
use common::clock::Clock;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use todo_service::config::AuthSettings;
use todo_service::models::{Todo, TokenResponse};
use todo_service::repositories::memory::{MemoryCollection, MemoryUserCollection};
use todo_service::routes::{self, AppState};
use tokio::task::JoinHandle;

/// Handle to the process-wide recorder shared by every test server.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder on first use.
///
/// The recorder can be installed only once per process, so all servers in a
/// test binary scrape the same registry. If something else installed a
/// recorder first, fall back to a detached one.
fn metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => PrometheusBuilder::new().build_recorder().handle(),
        })
        .clone()
}

/// Test harness for spawning the todo server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_flow() -> Result<()> {
///     let server = TestTodoServer::spawn().await?;
///     let token = server.signup("alice", "secret").await?;
///
///     let response = server
///         .client()
///         .get(format!("{}/todo", server.url()))
///         .bearer_auth(&token)
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTodoServer {
    addr: SocketAddr,
    clock: Arc<MockClock>,
    todos: Arc<MemoryCollection<Todo>>,
    users: Arc<MemoryUserCollection>,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestTodoServer {
    /// Spawn a server with the default test auth settings
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        let settings = test_auth_settings()?;
        Self::spawn_with_settings(settings).await
    }

    /// Spawn a server with custom auth settings
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Use fresh in-memory user and todo stores
    /// - Evaluate token expiry against a mock clock
    pub async fn spawn_with_settings(settings: AuthSettings) -> Result<Self, anyhow::Error> {
        let clock = Arc::new(MockClock::starting_now());
        let todos = Arc::new(MemoryCollection::<Todo>::new());
        let users = Arc::new(MemoryUserCollection::new());

        let state = AppState::new(&settings, clock.clone(), users.clone(), todos.clone())
            .map_err(|e| anyhow::anyhow!("Failed to build app state: {}", e))?;

        let app = routes::build_routes(Arc::new(state), metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            clock,
            todos,
            users,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// HTTP client for talking to this server
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The clock the server validates tokens against
    pub fn clock(&self) -> &MockClock {
        &self.clock
    }

    /// Current time on the server's clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Move the server's clock forward
    pub fn advance_clock(&self, by: chrono::Duration) {
        self.clock.advance(by);
    }

    /// Direct access to the todo store, e.g. to simulate an outage
    pub fn todo_store(&self) -> &MemoryCollection<Todo> {
        &self.todos
    }

    /// Direct access to the user store
    pub fn user_store(&self) -> &MemoryUserCollection {
        &self.users
    }

    /// Sign up and return the issued access token
    pub async fn signup(&self, username: &str, password: &str) -> Result<String, anyhow::Error> {
        self.credentials_request("signup", username, password).await
    }

    /// Log in and return the issued access token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, anyhow::Error> {
        self.credentials_request("login", username, password).await
    }

    /// Create a todo as the token's owner and return the response `data` object
    pub async fn create_todo(
        &self,
        token: &str,
        title: &str,
    ) -> Result<serde_json::Value, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/todo", self.url()))
            .bearer_auth(token)
            .json(&json!({"title": title, "description": "", "completed": false}))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::CREATED {
            anyhow::bail!("create todo failed with status {}", response.status());
        }

        let mut body: serde_json::Value = response.json().await?;
        Ok(body["data"].take())
    }

    async fn credentials_request(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<String, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/{}", self.url(), path))
            .json(&json!({"username": username, "password": password}))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("{} failed with status {}", path, response.status());
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

impl Drop for TestTodoServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
