use crate::cli::args::Command;
use crate::cli::params::{FetchAssetsParams, SmokeTestParams};
use crate::client::ServiceEndpoints;
use crate::config::load_config;
use crate::error::MarkmapToolsError;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    FetchAssets(FetchAssetsParams),
    SmokeTest(SmokeTestParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, MarkmapToolsError> {
    match command {
        Command::FetchAssets {
            config_path,
            output_dir,
        } => {
            let app_config = load_config(config_path.as_deref())?;
            let assets = app_config.assets.files;

            if assets.is_empty() {
                return Err(MarkmapToolsError::CliArgumentValidation {
                    details: "No assets to download. Configure assets.files or drop the config file."
                        .to_string(),
                });
            }

            let mut seen = HashSet::new();
            for asset in &assets {
                if matches!(asset.file_name.as_str(), "" | "." | "..")
                    || asset.file_name.contains(['/', '\\'])
                {
                    return Err(MarkmapToolsError::CliArgumentValidation {
                        details: format!(
                            "Asset file name {:?} for {} must be a plain file name.",
                            asset.file_name, asset.url
                        ),
                    });
                }
                if !seen.insert(asset.file_name.as_str()) {
                    return Err(MarkmapToolsError::CliArgumentValidation {
                        details: format!("Asset file name {} is used more than once.", asset.file_name),
                    });
                }
            }

            let output_dir = output_dir
                .map(PathBuf::from)
                .unwrap_or(app_config.assets.output_dir);

            Ok(ResolvedCommand::FetchAssets(FetchAssetsParams {
                assets,
                output_dir,
            }))
        }
        Command::SmokeTest {
            config_path,
            base_url,
            output_path,
        } => {
            let service = load_config(config_path.as_deref())?.service;

            for (name, value) in [
                ("health_timeout_secs", service.health_timeout_secs),
                ("render_timeout_secs", service.render_timeout_secs),
            ] {
                if value == 0 {
                    return Err(MarkmapToolsError::CliArgumentValidation {
                        details: format!("{name} must be greater than 0."),
                    });
                }
            }

            let base_url = base_url.unwrap_or(service.base_url);
            let endpoints = ServiceEndpoints::new(&base_url)?;

            Ok(ResolvedCommand::SmokeTest(SmokeTestParams {
                endpoints,
                request: service.sample,
                output_path: output_path
                    .map(PathBuf::from)
                    .unwrap_or(service.output_path),
                health_timeout: Duration::from_secs(service.health_timeout_secs),
                render_timeout: Duration::from_secs(service.render_timeout_secs),
            }))
        }
    }
}
