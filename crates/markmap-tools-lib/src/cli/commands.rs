use crate::cli::{ResolvedCommand, run_fetch_assets, run_smoke_test};
use std::process::ExitCode;

/// Runs a resolved command; the report is already printed, so only the exit code is left.
pub async fn run_command(command: ResolvedCommand) -> ExitCode {
    let result = match command {
        ResolvedCommand::FetchAssets(params) => run_fetch_assets(params).await.map(|_| ()),
        ResolvedCommand::SmokeTest(params) => run_smoke_test(params).await.map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Exiting with failure: {:?}", err);
            ExitCode::FAILURE
        }
    }
}
