//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Ensure the upload root and its `resumes/` subdirectory exist.
pub async fn ensure_upload_dir(upload_dir: &str) -> anyhow::Result<PathBuf> {
    let root = Path::new(upload_dir);
    let resumes = root.join("resumes");
    tokio::fs::create_dir_all(&resumes)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", resumes.display()))?;
    if root.is_relative() {
        warn!(%upload_dir, "upload directory is relative to the working directory");
    }
    info!(path = %resumes.display(), "upload directory ready");
    Ok(root.to_path_buf())
}
