use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use eyre::Result;
use markmap_tools_lib::config::AssetSource;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Paths requested from a mock server, in arrival order.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    fn record(&self, path: &str) {
        self.0
            .lock()
            .expect("request log poisoned")
            .push(path.to_string());
    }

    pub fn paths(&self) -> Vec<String> {
        self.0.lock().expect("request log poisoned").clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| p.as_str() == path).count()
    }
}

async fn record_request(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    log.record(request.uri().path());
    next.run(request).await
}

/// Serves `app` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_server(app: Router, log: RequestLog) -> Result<String> {
    let app = app.layer(middleware::from_fn_with_state(log, record_request));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Mock server stopped: {}", err);
        }
    });
    Ok(format!("http://{addr}"))
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// Deterministic body for the asset served at `path`, large enough to arrive in several chunks.
pub fn asset_body(path: &str, len: usize) -> Vec<u8> {
    let seed = path.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
    (0..len).map(|i| seed.wrapping_add((i % 251) as u8)).collect()
}

/// The three default file names, pointed at `base_url`.
pub fn test_asset_sources(base_url: &str) -> Vec<AssetSource> {
    vec![
        AssetSource::new(format!("{base_url}/assets/lib.js"), "markmap-lib.js"),
        AssetSource::new(format!("{base_url}/assets/view.js"), "markmap-view.js"),
        AssetSource::new(format!("{base_url}/assets/d3.js"), "d3.min.js"),
    ]
}
