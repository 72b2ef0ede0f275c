use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedAsset {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Hex SHA-256 of the downloaded body, for logs only.
    pub sha256: String,
}
