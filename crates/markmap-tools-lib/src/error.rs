use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which request a service error happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Health,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Health => f.write_str("health check"),
            Stage::Render => f.write_str("render request"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MarkmapToolsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to download {url}: {reason}")]
    AssetDownload { url: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    AssetWrite { path: PathBuf, reason: String },

    #[error("Could not connect to the server during the {stage} ({url}): {reason}")]
    ServerUnreachable {
        stage: Stage,
        url: String,
        reason: String,
    },

    #[error("The {stage} to {url} timed out (more than {timeout_secs} seconds)")]
    RequestTimeout {
        stage: Stage,
        url: String,
        timeout_secs: u64,
    },

    #[error("Server responded with unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Service rejected the render request with status {status}: {detail}")]
    RenderRejected { status: u16, detail: String },

    #[error("Invalid render request: {details}")]
    InvalidRenderRequest { details: String },

    #[error("Failed to write rendered image to {path}: {reason}")]
    ImageWrite { path: PathBuf, reason: String },

    #[error("Invalid command line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

impl MarkmapToolsError {
    /// Short, actionable suggestions printed under the error message.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            MarkmapToolsError::ServerUnreachable {
                stage: Stage::Health,
                ..
            } => &[
                "Make sure the server is running:",
                "- locally: npm start",
                "- Docker: docker-compose up -d",
            ],
            MarkmapToolsError::ServerUnreachable {
                stage: Stage::Render,
                ..
            } => &[
                "Please check:",
                "- that the server is still running",
                "- that the port is correct (default 3000)",
            ],
            MarkmapToolsError::RequestTimeout {
                stage: Stage::Health,
                ..
            } => &[
                "The server is not responding. Please check:",
                "- that the server is running",
                "- that the port is correct (default 3000)",
            ],
            MarkmapToolsError::RequestTimeout {
                stage: Stage::Render,
                ..
            } => &[
                "Possible causes:",
                "- the server is short on resources",
                "- the markdown content is too large",
                "- network connectivity problems",
            ],
            MarkmapToolsError::AssetDownload { .. } => &[
                "Check your network connection and that the CDN is reachable.",
            ],
            MarkmapToolsError::UnexpectedStatus { .. } => &["Check the server logs for details."],
            _ => &[],
        }
    }
}
