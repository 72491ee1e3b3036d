//! Writing a compiled project to disk

use crate::model::CompileOutput;
use crate::template::BINARY_PREFIX;
use anyhow::{Context, Result};
use base64::Engine;
use std::path::Path;
use tokio::fs;

/// Decode a file's content into the bytes to write
fn file_bytes(path: &str, content: &str) -> Result<Vec<u8>> {
    match content.strip_prefix(BINARY_PREFIX) {
        Some(payload) => base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .with_context(|| format!("Invalid base64 payload in {}", path)),
        None => Ok(content.as_bytes().to_vec()),
    }
}

/// Write every output file under `target_dir`, returning the written paths in order
pub async fn write_project(output: &CompileOutput, target_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    let mut written = Vec::with_capacity(output.files.len());

    for (file_path, content) in &output.files {
        let target_path = target_dir.join(file_path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let bytes = file_bytes(file_path, content)?;
        fs::write(&target_path, &bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        written.push(file_path.clone());
    }

    tracing::debug!("Wrote {} files to {}", written.len(), target_dir.display());
    Ok(written)
}
