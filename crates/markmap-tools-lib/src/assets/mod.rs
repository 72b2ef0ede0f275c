mod fetch;
mod types;

pub use fetch::fetch_asset;
pub use types::FetchedAsset;
