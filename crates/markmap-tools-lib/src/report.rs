//! Human-readable lines written to stdout by both tools.

use crate::assets::FetchedAsset;
use crate::client::{HealthReport, RenderOutcome, RenderRequest};
use crate::error::MarkmapToolsError;
use crate::utils::{format_thousands, truncate_chars};
use std::path::Path;

const RULE_WIDTH: usize = 60;
const MARKDOWN_PREVIEW_CHARS: usize = 50;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn banner(title: &str) -> String {
    format!("{}\n{}\n{}", rule(), title, rule())
}

/// The error message followed by its indented hints.
pub fn failure(prefix: &str, err: &MarkmapToolsError) -> String {
    let mut out = format!("✗ {prefix}: {err}");
    for hint in err.hints() {
        out.push_str("\n  ");
        out.push_str(hint);
    }
    out
}

pub fn healthy(report: &HealthReport) -> String {
    format!("✓ Server is healthy (version: {})", report.version_or_unknown())
}

pub fn render_request(url: &str, request: &RenderRequest) -> String {
    format!(
        "Sending render request to {url}...\nMarkdown: {}...\nImage size: {}x{} ({})",
        truncate_chars(&request.markdown, MARKDOWN_PREVIEW_CHARS),
        request.width,
        request.height,
        request.format
    )
}

pub fn render_success(outcome: &RenderOutcome) -> String {
    format!(
        "✓ Render succeeded!\n  - elapsed: {:.2} s\n  - file: {}\n  - size: {} bytes ({:.2} KB)",
        outcome.elapsed.as_secs_f64(),
        outcome.output_path.display(),
        format_thousands(outcome.size),
        outcome.size as f64 / 1024.0
    )
}

pub fn asset_size_line(name: &str, size: u64) -> String {
    format!("  - {} ({} bytes)", name, format_thousands(size))
}

/// Summary of the files as they exist on disk after a fetch.
pub fn asset_summary(assets: &[FetchedAsset]) -> String {
    let mut out = String::from("All files downloaded.\nFile locations:");
    for asset in assets {
        let size = on_disk_size(&asset.path).unwrap_or(asset.size);
        out.push('\n');
        out.push_str(&asset_size_line(&asset.file_name, size));
    }
    out
}

fn on_disk_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}
