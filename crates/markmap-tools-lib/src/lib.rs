pub mod assets;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod utils;

pub use config::Config;
pub use error::MarkmapToolsError;
