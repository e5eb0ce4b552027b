//! Test server harness for E2E testing
//!
//! Provides `TestTokenServer` for spawning real token service instances in tests.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use token_service::config::Config;
use token_service::routes::{self, AppState};
use token_service::services::{RtcTokenSigner, TokenSigner};

/// App id used by every test server.
pub const TEST_APP_ID: &str = "970CA35de60c44645bbae8a215061b33";

/// App certificate used by every test server.
pub const TEST_APP_CERTIFICATE: &str = "5CFd2fd1755d40ecb72977518be15d3b";

/// Process-wide metrics handle.
///
/// The global recorder can only be installed once per process. The first
/// server installs it; if something else already did, fall back to a
/// detached handle so `/metrics` still renders.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            routes::init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Test harness for spawning the token service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_flow_e2e() -> Result<(), anyhow::Error> {
///     let server = TestTokenServer::spawn().await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestTokenServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestTokenServer {
    /// Spawn a server that signs real tokens with the test credentials.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        let config = test_config()?;
        let signer = Arc::new(RtcTokenSigner::from_config(&config));
        Self::start(config, signer).await
    }

    /// Spawn a server backed by the given signer, typically a
    /// `MockTokenSigner`.
    pub async fn spawn_with_signer(signer: Arc<dyn TokenSigner>) -> Result<Self, anyhow::Error> {
        Self::start(test_config()?, signer).await
    }

    async fn start(config: Config, signer: Arc<dyn TokenSigner>) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState { signer });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state, metrics_handle());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestTokenServer {
    fn drop(&mut self) {
        // Abort the server task so the port is released when the test ends
        self._handle.abort();
    }
}

fn test_config() -> Result<Config, anyhow::Error> {
    let vars = HashMap::from([
        ("AGORA_APP_ID".to_string(), TEST_APP_ID.to_string()),
        (
            "AGORA_APP_CERTIFICATE".to_string(),
            TEST_APP_CERTIFICATE.to_string(),
        ),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
    ]);

    Config::from_vars(&vars).map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))
}
