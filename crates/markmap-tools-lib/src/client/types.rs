use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const MIN_DIMENSION: u32 = 100;
pub const MAX_DIMENSION: u32 = 10_000;

const SAMPLE_MARKDOWN: &str =
    "# Test Title\n## Branch 1\n- Item 1\n- Item 2\n## Branch 2\n- Item 3";

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => f.write_str("png"),
            ImageFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// Body of `POST /api/render`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RenderRequest {
    pub markdown: String,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            markdown: SAMPLE_MARKDOWN.to_string(),
            width: 1920,
            height: 1080,
            format: ImageFormat::Png,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceEndpointPaths {
    pub render: Option<String>,
    pub health: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceFeatures {
    pub formats: Vec<String>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub default_width: Option<u32>,
    pub default_height: Option<u32>,
}

/// Body of `GET /api/health`. Every field is optional, and a field whose
/// value has an unexpected shape is treated as absent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthReport {
    #[serde(deserialize_with = "scalar_as_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub service: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub version: Option<String>,
    #[serde(deserialize_with = "scalar_as_string")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub endpoints: Option<ServiceEndpointPaths>,
    #[serde(deserialize_with = "lenient")]
    pub features: Option<ServiceFeatures>,
}

/// Strings pass through; numbers and booleans are shown as written.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

impl HealthReport {
    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

/// JSON error payload the service sends with non-200 responses.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl fmt::Display for ServiceErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => write!(f, "{error}: {message}"),
            (Some(error), None) => f.write_str(error),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("no error details"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub output_path: PathBuf,
    pub size: u64,
    pub elapsed: Duration,
}
