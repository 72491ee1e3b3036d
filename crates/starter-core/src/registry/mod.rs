//! Integration registry access
//!
//! This module provides:
//! - Registry manifest and descriptor types
//! - Fetching integrations and custom templates from remote URLs or local directories
//! - A download cache seam
//! - CLI version compatibility checks

pub mod cache;
pub mod fetcher;
pub mod manifest;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub use cache::{Cache, NoCache, TimedCache, DEFAULT_TTL};
pub use fetcher::{IntegrationFetcher, IntegrationSource, REGISTRY_MANIFEST};
pub use manifest::{IntegrationInfo, RegistryManifest, TemplateInfo};
pub use version::{check_compatibility, compatibility_warnings};

/// Build zip bundles for every integration and template in a local registry.
/// Returns the number of bundles written.
pub async fn build_zips<C: ProductConfig>(
    config: &C,
    registry_dir: &Option<PathBuf>,
) -> Result<usize> {
    let dir = registry_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("integrations"));

    if !dir.exists() {
        anyhow::bail!("Integrations directory not found: {}", dir.display());
    }

    let manifest_path = dir.join(REGISTRY_MANIFEST);
    let manifest_content = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest: RegistryManifest =
        serde_yaml::from_str(&manifest_content).context("Failed to parse registry manifest")?;

    println!(
        "{}",
        format!("Building {} integration bundles...", config.display_name())
            .cyan()
            .bold()
    );
    println!();

    let mut built = 0;
    for id in manifest.integrations.iter().chain(manifest.templates.iter()) {
        print!("  {} {}...", "->".blue(), id);

        match write_bundle(&dir, id) {
            Ok(size) => {
                println!(" {} ({} bytes)", "done".green(), size);
                built += 1;
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {:#}", e);
            }
        }
    }

    println!();
    println!(
        "{} {} bundle(s) in {}",
        "Built".green().bold(),
        built,
        dir.display()
    );

    Ok(built)
}

fn write_bundle(dir: &Path, id: &str) -> Result<usize> {
    let zip_bytes = IntegrationFetcher::build_local_zip(dir, id)?;
    let zip_path = dir.join(format!("{}.zip", id));
    std::fs::write(&zip_path, &zip_bytes)
        .with_context(|| format!("Failed to write {}", zip_path.display()))?;
    Ok(zip_bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestProduct;

    impl ProductConfig for TestProduct {
        fn name(&self) -> &'static str {
            "test"
        }
        fn display_name(&self) -> &'static str {
            "Test"
        }
        fn default_registry_url(&self) -> &'static str {
            "https://example.com/registry"
        }
        fn registry_url_env(&self) -> &'static str {
            "TEST_REGISTRY_URL"
        }
        fn docs_url(&self) -> &'static str {
            "https://example.com/docs"
        }
        fn cli_description(&self) -> &'static str {
            "test"
        }
        fn upgrade_command(&self) -> &'static str {
            "upgrade"
        }
    }

    #[tokio::test]
    async fn test_build_zips_writes_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(REGISTRY_MANIFEST), "integrations: [query, missing]\n").unwrap();
        std::fs::create_dir_all(root.join("query/assets")).unwrap();
        std::fs::write(root.join("query/info.yaml"), "id: query\nname: Query\n").unwrap();
        std::fs::write(root.join("query/assets/a.ts"), "export {}\n").unwrap();

        let built = build_zips(&TestProduct, &Some(root.to_path_buf()))
            .await
            .unwrap();
        assert_eq!(built, 1);
        assert!(root.join("query.zip").exists());
        assert!(!root.join("missing.zip").exists());
    }

    #[tokio::test]
    async fn test_build_zips_requires_directory() {
        let err = build_zips(&TestProduct, &Some(PathBuf::from("/nonexistent/registry")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
