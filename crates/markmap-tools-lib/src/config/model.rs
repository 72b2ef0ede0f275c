use crate::client::RenderRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_ASSETS_DIR: &str = "markmap";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_OUTPUT_PATH: &str = "mindmap.png";

const MARKMAP_LIB_URL: &str = "https://unpkg.com/markmap-lib@0.18.12/dist/browser/index.iife.js";
const MARKMAP_VIEW_URL: &str = "https://unpkg.com/markmap-view@0.18.12/dist/browser/index.js";
const D3_JS_URL: &str = "https://unpkg.com/d3@7/dist/d3.min.js";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssetSource {
    pub url: String,
    pub file_name: String,
}

impl AssetSource {
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AssetsConfig {
    pub output_dir: PathBuf,
    pub files: Vec<AssetSource>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            // markmap-view needs d3 at runtime, so all three are fetched.
            files: vec![
                AssetSource::new(MARKMAP_LIB_URL, "markmap-lib.js"),
                AssetSource::new(MARKMAP_VIEW_URL, "markmap-view.js"),
                AssetSource::new(D3_JS_URL, "d3.min.js"),
            ],
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub health_timeout_secs: u64,
    pub render_timeout_secs: u64,
    pub output_path: PathBuf,
    pub sample: RenderRequest,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            health_timeout_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
            render_timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            sample: RenderRequest::default(),
        }
    }
}
