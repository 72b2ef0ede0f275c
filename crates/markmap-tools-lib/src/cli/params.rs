use crate::client::{RenderRequest, ServiceEndpoints};
use crate::config::AssetSource;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchAssetsParams {
    pub assets: Vec<AssetSource>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SmokeTestParams {
    pub endpoints: ServiceEndpoints,
    pub request: RenderRequest,
    pub output_path: PathBuf,
    pub health_timeout: Duration,
    pub render_timeout: Duration,
}
