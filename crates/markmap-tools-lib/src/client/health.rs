use super::{HealthReport, ServiceEndpoints, classify_request_error};
use crate::error::{MarkmapToolsError, Stage};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub async fn check_health(
    client: &Client,
    endpoints: &ServiceEndpoints,
    timeout: Duration,
) -> Result<HealthReport, MarkmapToolsError> {
    let url = &endpoints.health;
    tracing::info!(url = %url, timeout_secs = timeout.as_secs(), "Checking service health");

    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_request_error(e, Stage::Health, url, timeout))?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!(url = %url, status = status.as_u16(), "Health check returned a non-OK status");
        return Err(MarkmapToolsError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| classify_request_error(e, Stage::Health, url, timeout))?;
    let report: HealthReport = serde_json::from_slice(&body)?;

    tracing::debug!(
        status = ?report.status,
        service = ?report.service,
        version = report.version_or_unknown(),
        features = ?report.features,
        "Service is healthy"
    );
    Ok(report)
}
