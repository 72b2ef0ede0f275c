use super::types::{MAX_DIMENSION, MIN_DIMENSION};
use super::{
    RenderOutcome, RenderRequest, ServiceEndpoints, ServiceErrorBody, classify_request_error,
};
use crate::error::{MarkmapToolsError, Stage};
use crate::utils::truncate_chars;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::{Duration, Instant};

const ERROR_TEXT_PREVIEW_CHARS: usize = 200;

impl RenderRequest {
    /// Applies the same bounds the render service enforces.
    pub fn validate(&self) -> Result<(), MarkmapToolsError> {
        if self.markdown.trim().is_empty() {
            return Err(MarkmapToolsError::InvalidRenderRequest {
                details: "markdown is required".to_string(),
            });
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(MarkmapToolsError::InvalidRenderRequest {
                    details: format!(
                        "{name} must be a number between {MIN_DIMENSION} and {MAX_DIMENSION}, got {value}"
                    ),
                });
            }
        }
        Ok(())
    }
}

pub async fn render(
    client: &Client,
    endpoints: &ServiceEndpoints,
    request: &RenderRequest,
    output_path: &Path,
    timeout: Duration,
) -> Result<RenderOutcome, MarkmapToolsError> {
    request.validate()?;

    let url = &endpoints.render;
    tracing::info!(
        url = %url,
        width = request.width,
        height = request.height,
        format = %request.format,
        "Sending render request"
    );

    let start = Instant::now();
    let response = client
        .post(url.clone())
        .json(request)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_request_error(e, Stage::Render, url, timeout))?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(e, Stage::Render, url, timeout))?;
        tracing::debug!(url = %url, status = status.as_u16(), "Render request was rejected");
        return Err(MarkmapToolsError::RenderRejected {
            status: status.as_u16(),
            detail: describe_error_body(&body),
        });
    }

    let image = response
        .bytes()
        .await
        .map_err(|e| classify_request_error(e, Stage::Render, url, timeout))?;
    let elapsed = start.elapsed();

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MarkmapToolsError::ImageWrite {
                path: output_path.to_path_buf(),
                reason: e.to_string(),
            })?;
    }
    tokio::fs::write(output_path, &image)
        .await
        .map_err(|e| MarkmapToolsError::ImageWrite {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::info!(
        output = %output_path.display(),
        bytes = image.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Rendered image saved"
    );

    Ok(RenderOutcome {
        output_path: output_path.to_path_buf(),
        size: image.len() as u64,
        elapsed,
    })
}

/// Turns an error response body into a one-line diagnostic.
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => {
            match serde_json::from_value::<ServiceErrorBody>(value.clone()) {
                Ok(parsed) if parsed.error.is_some() || parsed.message.is_some() => {
                    parsed.to_string()
                }
                _ => value.to_string(),
            }
        }
        Ok(value) => value.to_string(),
        Err(_) => truncate_chars(body, ERROR_TEXT_PREVIEW_CHARS).to_string(),
    }
}
