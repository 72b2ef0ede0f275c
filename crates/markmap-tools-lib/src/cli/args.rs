use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchAssets {
        config_path: Option<String>,
        output_dir: Option<String>,
    },
    SmokeTest {
        config_path: Option<String>,
        base_url: Option<String>,
        output_path: Option<String>,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "markmap-fetch-assets",
    version,
    about = "Download the markmap-lib, markmap-view and d3 browser bundles from unpkg"
)]
struct FetchAssetsCli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file overriding the asset list and output directory"
    )]
    config: Option<String>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Overrides the directory the assets are written to (default: markmap)"
    )]
    output_dir: Option<String>,
}

#[derive(Debug, Parser)]
#[command(
    name = "markmap-smoke-test",
    version,
    about = "Check a markmap render service's health and render a sample mindmap"
)]
struct SmokeTestCli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file overriding the service URL, timeouts and sample request"
    )]
    config: Option<String>,

    #[arg(
        short = 'u',
        long = "base-url",
        value_name = "URL",
        help = "Overrides the render service base URL (default: http://localhost:3000)"
    )]
    base_url: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Overrides the path the rendered image is written to (default: mindmap.png)"
    )]
    output: Option<String>,
}

fn log_level(verbose: u8) -> Level {
    // stdout carries the report, so logs stay quiet unless asked for.
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn env_filter(log_level: Level) -> EnvFilter {
    let mut filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    if let Ok(directive) = "hyper_util=warn".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    filter
}

fn init_tracing(log_level: Level) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(log_level))
        .init();
}

pub fn parse_fetch_assets_args() -> Args {
    let cli = FetchAssetsCli::parse();
    let log_level = log_level(cli.verbose);
    init_tracing(log_level);

    Args {
        command: fetch_assets_command(cli),
        log_level,
    }
}

pub fn parse_smoke_test_args() -> Args {
    let cli = SmokeTestCli::parse();
    let log_level = log_level(cli.verbose);
    init_tracing(log_level);

    Args {
        command: smoke_test_command(cli),
        log_level,
    }
}

fn fetch_assets_command(cli: FetchAssetsCli) -> Command {
    Command::FetchAssets {
        config_path: cli.config,
        output_dir: cli.output_dir,
    }
}

fn smoke_test_command(cli: SmokeTestCli) -> Command {
    Command::SmokeTest {
        config_path: cli.config,
        base_url: cli.base_url,
        output_path: cli.output,
    }
}
