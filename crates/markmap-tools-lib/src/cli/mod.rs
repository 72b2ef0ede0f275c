mod args;
mod commands;
mod fetch_assets;
mod params;
mod resolved_command;

pub use args::{Args, Command, parse_fetch_assets_args, parse_smoke_test_args};
pub use commands::run_command;
pub use fetch_assets::run_fetch_assets;
pub use params::{FetchAssetsParams, SmokeTestParams};
pub use resolved_command::{ResolvedCommand, resolve_command};
pub use smoke_test::run_smoke_test;
