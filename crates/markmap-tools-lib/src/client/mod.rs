mod endpoints;
mod health;
mod render;
mod types;

pub use endpoints::ServiceEndpoints;
pub use health::check_health;
pub use render::render;
pub use types::{
    HealthReport, ImageFormat, RenderOutcome, RenderRequest, ServiceEndpointPaths,
    ServiceErrorBody, ServiceFeatures,
};

use crate::error::{MarkmapToolsError, Stage};
use crate::utils::error_chain;
use std::time::Duration;
use url::Url;

/// Maps a transport failure onto the error the user should see.
pub(crate) fn classify_request_error(
    err: reqwest::Error,
    stage: Stage,
    url: &Url,
    timeout: Duration,
) -> MarkmapToolsError {
    if err.is_timeout() {
        MarkmapToolsError::RequestTimeout {
            stage,
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    } else if err.is_connect() {
        MarkmapToolsError::ServerUnreachable {
            stage,
            url: url.to_string(),
            reason: error_chain(&err),
        }
    } else {
        MarkmapToolsError::Http(err)
    }
}
