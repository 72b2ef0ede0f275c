use crate::error::MarkmapToolsError;
use url::Url;

const HEALTH_PATH: &str = "api/health";
const RENDER_PATH: &str = "api/render";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub health: Url,
    pub render: Url,
}

impl ServiceEndpoints {
    pub fn new(base_url: &str) -> Result<Self, MarkmapToolsError> {
        let invalid = |reason: String| MarkmapToolsError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }
        // Url::join replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            health: base.join(HEALTH_PATH).map_err(|e| invalid(e.to_string()))?,
            render: base.join(RENDER_PATH).map_err(|e| invalid(e.to_string()))?,
        })
    }
}
