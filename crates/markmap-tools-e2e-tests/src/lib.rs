mod test_utils;

pub use test_utils::{
    RequestLog, asset_body, spawn_server, test_asset_sources, unreachable_base_url,
};
