use markmap_tools_lib::cli::{parse_fetch_assets_args, resolve_command, run_command};
use markmap_tools_lib::error::MarkmapToolsError;
use std::process::ExitCode;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode, MarkmapToolsError> {
    color_eyre::install()?;

    let args = parse_fetch_assets_args();
    let command = resolve_command(args.command)?;

    Ok(run_command(command).await)
}
