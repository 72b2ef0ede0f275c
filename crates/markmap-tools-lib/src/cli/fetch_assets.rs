use crate::assets::{FetchedAsset, fetch_asset};
use crate::cli::FetchAssetsParams;
use crate::error::MarkmapToolsError;
use crate::report;
use crate::utils::build_http_client;

/// Downloads every asset in order, stopping at the first failure.
pub async fn run_fetch_assets(
    params: FetchAssetsParams,
) -> Result<Vec<FetchedAsset>, MarkmapToolsError> {
    let result = fetch_all(&params).await;

    match &result {
        Ok(fetched) => {
            println!();
            println!("{}", report::asset_summary(fetched));
        }
        Err(err) => println!("{}", report::failure("Download failed", err)),
    }
    result
}

async fn fetch_all(params: &FetchAssetsParams) -> Result<Vec<FetchedAsset>, MarkmapToolsError> {
    let FetchAssetsParams { assets, output_dir } = params;

    println!("Downloading markmap assets to: {}", output_dir.display());
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| MarkmapToolsError::AssetWrite {
            path: output_dir.clone(),
            reason: e.to_string(),
        })?;

    let client = build_http_client()?;
    let mut fetched = Vec::with_capacity(assets.len());

    for asset in assets {
        println!();
        println!("Downloading: {}", asset.url);
        let downloaded = fetch_asset(&client, asset, output_dir).await?;
        println!("✓ Downloaded: {}", downloaded.path.display());
        fetched.push(downloaded);
    }

    tracing::info!(count = fetched.len(), "All assets downloaded");
    Ok(fetched)
}
