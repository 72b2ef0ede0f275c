use super::types::FetchedAsset;
use crate::config::AssetSource;
use crate::error::MarkmapToolsError;
use crate::utils::error_chain;
use futures::StreamExt;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Downloads one asset into `output_dir`, replacing any existing file.
///
/// The body is streamed into `<file_name>.part` and renamed once complete, so
/// the destination only appears after a successful download.
pub async fn fetch_asset(
    client: &Client,
    asset: &AssetSource,
    output_dir: &Path,
) -> Result<FetchedAsset, MarkmapToolsError> {
    let output_path = output_dir.join(&asset.file_name);
    let part_path = output_dir.join(format!("{}.part", asset.file_name));
    tracing::info!(url = %asset.url, output = %output_path.display(), "Downloading");

    let download_error = |e: reqwest::Error| MarkmapToolsError::AssetDownload {
        url: asset.url.clone(),
        reason: error_chain(&e),
    };

    let response = client
        .get(&asset.url)
        .send()
        .await
        .map_err(download_error)?
        .error_for_status()
        .map_err(download_error)?;

    let (size, digest) = match stream_to_file(response, &asset.url, &part_path).await {
        Ok(result) => result,
        Err(err) => {
            if let Err(remove_err) = tokio::fs::remove_file(&part_path).await {
                tracing::debug!(path = %part_path.display(), "Could not remove partial file: {}", remove_err);
            }
            return Err(err);
        }
    };

    tokio::fs::rename(&part_path, &output_path)
        .await
        .map_err(|e| MarkmapToolsError::AssetWrite {
            path: output_path.clone(),
            reason: e.to_string(),
        })?;

    let sha256 = hex::encode(digest);
    tracing::info!(output = %output_path.display(), size, sha256 = %sha256, "Downloaded");

    Ok(FetchedAsset {
        file_name: asset.file_name.clone(),
        path: output_path,
        size,
        sha256,
    })
}

async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    part_path: &Path,
) -> Result<(u64, Vec<u8>), MarkmapToolsError> {
    let write_error = |e: std::io::Error| MarkmapToolsError::AssetWrite {
        path: part_path.to_path_buf(),
        reason: e.to_string(),
    };

    let file = tokio::fs::File::create(part_path)
        .await
        .map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    let mut hasher = Sha256::new();
    let mut size = 0u64;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| MarkmapToolsError::AssetDownload {
            url: url.to_string(),
            reason: error_chain(&e),
        })?;
        hasher.update(&chunk);
        size += chunk.len() as u64;
        writer.write_all(&chunk).await.map_err(write_error)?;
    }

    writer.flush().await.map_err(write_error)?;
    tracing::trace!(path = %part_path.display(), size, "Finished streaming body");

    Ok((size, hasher.finalize().to_vec()))
}
