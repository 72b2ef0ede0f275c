use super::Config;
use crate::error::MarkmapToolsError;
use config::Config as ConfigBuilder;

/// Loads the optional config file. Without one, the built-in defaults apply.
pub fn load_config(config_path: Option<&str>) -> Result<Config, MarkmapToolsError> {
    let Some(config_path) = config_path else {
        tracing::debug!("No config file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from {}", config_path);
    let config_builder = ConfigBuilder::builder()
        .add_source(config::File::with_name(config_path))
        .build()?;

    config_builder.try_deserialize().map_err(Into::into)
}
