//! Integration fetching from a remote registry or a local directory
//!
//! Remote registries serve pre-built `<id>.zip` bundles. Local registries
//! build the same bundle in memory from `<id>/`, so both go through one
//! extraction path.

use super::cache::{Cache, TimedCache, DEFAULT_TTL};
use super::manifest::{IntegrationInfo, RegistryManifest, TemplateInfo};
use crate::config::PersistedConfig;
use crate::model::{CompileOptions, CustomTemplate, Integration};
use crate::product::ProductConfig;
use crate::template::BINARY_PREFIX;
use anyhow::{Context, Result};
use base64::Engine;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use url::Url;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Root manifest file name
pub const REGISTRY_MANIFEST: &str = "registry.yaml";
/// Integration descriptor inside a bundle
pub const INTEGRATION_DESCRIPTOR: &str = "info.yaml";
/// Custom template descriptor inside a bundle
pub const TEMPLATE_DESCRIPTOR: &str = "template.yaml";
/// Directory whose tree becomes the virtual file paths
pub const ASSETS_DIR: &str = "assets/";

/// Registry source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum IntegrationSource {
    Remote(Url),
    Local(PathBuf),
}

impl IntegrationSource {
    /// Remote source from the product config, honouring the override env var
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.registry_url_env())
            .unwrap_or_else(|_| config.default_registry_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid registry URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Files of one extracted bundle, keyed by path relative to `<id>/`
#[derive(Debug, Clone, Default)]
struct Bundle {
    files: BTreeMap<String, Vec<u8>>,
}

impl Bundle {
    fn descriptor(&self, id: &str, name: &str) -> Result<&str> {
        let bytes = self
            .files
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("'{}' bundle is missing {}", id, name))?;
        std::str::from_utf8(bytes).with_context(|| format!("'{}' {} is not valid UTF-8", id, name))
    }

    /// Asset files with the `assets/` prefix stripped
    fn assets(&self) -> BTreeMap<String, String> {
        self.files
            .iter()
            .filter_map(|(path, bytes)| {
                let relative = path.strip_prefix(ASSETS_DIR)?;
                Some((relative.to_string(), decode_asset(bytes)))
            })
            .collect()
    }
}

/// UTF-8 assets pass through; anything else is stored as `base64::<payload>`
pub fn decode_asset(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!(
            "{}{}",
            BINARY_PREFIX,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ),
    }
}

/// Integration fetcher - retrieves descriptors and assets from a registry
pub struct IntegrationFetcher {
    source: IntegrationSource,
    client: reqwest::Client,
    cache: Arc<dyn Cache>,
}

impl IntegrationFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: IntegrationSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache: Arc::new(TimedCache::new()),
        }
    }

    /// Replace the download cache
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = cache;
        self
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = IntegrationSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Create a fetcher for a local registry
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(IntegrationSource::local(path), user_agent)
    }

    pub fn source(&self) -> &IntegrationSource {
        &self.source
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        if let Some(bytes) = self.cache.get(url.as_str()) {
            tracing::debug!("Cache hit for {}", url);
            return Ok(bytes);
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        let bytes = response.bytes().await?.to_vec();
        self.cache.put(url.as_str(), bytes.clone(), DEFAULT_TTL);
        Ok(bytes)
    }

    /// Fetch the root manifest listing available integrations and templates
    pub async fn fetch_registry_manifest(&self) -> Result<RegistryManifest> {
        let content = match &self.source {
            IntegrationSource::Remote(base_url) => {
                let url = Self::build_url(base_url, REGISTRY_MANIFEST)?;
                let bytes = self.download(&url).await?;
                String::from_utf8(bytes).context("Registry manifest is not valid UTF-8")?
            }
            IntegrationSource::Local(path) => {
                let manifest_path = path.join(REGISTRY_MANIFEST);
                fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?
            }
        };
        serde_yaml::from_str(&content).context("Failed to parse registry manifest")
    }

    /// Zip `<registry_dir>/<id>/` in memory, entries prefixed with `<id>/`
    pub fn build_local_zip(registry_dir: &Path, id: &str) -> Result<Vec<u8>> {
        let root = registry_dir.join(id);
        if !root.is_dir() {
            anyhow::bail!("'{}' not found in {}", id, registry_dir.display());
        }

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for entry in WalkDir::new(&root).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&root)
                    .with_context(|| format!("{} is outside {}", entry.path().display(), id))?;
                let relative = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");

                let content = std::fs::read(entry.path())
                    .with_context(|| format!("Failed to read {}", entry.path().display()))?;
                zip.start_file(format!("{}/{}", id, relative), options)?;
                zip.write_all(&content)?;
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    fn extract_zip(zip_bytes: &[u8], id: &str) -> Result<Bundle> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes))
            .with_context(|| format!("Failed to read zip archive for '{}'", id))?;

        let prefix = format!("{}/", id);
        let mut files = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let full_path = file.name().to_string();
            let relative = full_path
                .strip_prefix(&prefix)
                .unwrap_or(&full_path)
                .to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(relative, contents);
        }

        Ok(Bundle { files })
    }

    async fn bundle(&self, id: &str) -> Result<Bundle> {
        let zip_bytes = match &self.source {
            IntegrationSource::Remote(base_url) => {
                let url = Self::build_url(base_url, &format!("{}.zip", id))?;
                self.download(&url).await?
            }
            IntegrationSource::Local(path) => Self::build_local_zip(path, id)?,
        };
        Self::extract_zip(&zip_bytes, id)
    }

    /// Fetch one integration: descriptor plus asset files
    pub async fn fetch_integration(&self, id: &str) -> Result<Integration> {
        let bundle = self.bundle(id).await?;
        let info: IntegrationInfo =
            serde_yaml::from_str(bundle.descriptor(id, INTEGRATION_DESCRIPTOR)?)
                .with_context(|| format!("Failed to parse integration '{}' descriptor", id))?;
        let integration = info.into_integration(id, bundle.assets())?;
        tracing::debug!(
            "Fetched {} ({} files)",
            integration.id,
            integration.files.len()
        );
        Ok(integration)
    }

    /// Fetch one custom template: descriptor plus asset files
    pub async fn fetch_template(&self, id: &str) -> Result<CustomTemplate> {
        let bundle = self.bundle(id).await?;
        let info: TemplateInfo = serde_yaml::from_str(bundle.descriptor(id, TEMPLATE_DESCRIPTOR)?)
            .with_context(|| format!("Failed to parse template '{}' descriptor", id))?;
        info.into_template(id, bundle.assets())
    }

    /// Resolve integration ids in order, failing on the first unknown id
    pub async fn resolve_integrations(&self, ids: &[String]) -> Result<Vec<Integration>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let manifest = self.fetch_registry_manifest().await?;

        let mut integrations = Vec::with_capacity(ids.len());
        for id in ids {
            if !manifest.integrations.contains(id) {
                anyhow::bail!("Unknown integration '{}'", id);
            }
            integrations.push(self.fetch_integration(id).await?);
        }
        Ok(integrations)
    }

    /// Rebuild full compile options from a persisted project config
    pub async fn resolve_options(&self, config: &PersistedConfig) -> Result<CompileOptions> {
        let chosen_integrations = self.resolve_integrations(&config.chosen_integrations).await?;
        let custom_template = match &config.custom_template {
            Some(id) => Some(self.fetch_template(id).await?),
            None => None,
        };

        Ok(CompileOptions {
            project_name: config.project_name.clone(),
            framework: config.framework,
            mode: config.mode,
            typescript: config.typescript,
            tailwind: config.tailwind,
            package_manager: config.package_manager,
            chosen_integrations,
            integration_options: config.integration_options.clone(),
            custom_template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Framework, PackageManager, RouterMode};

    fn write(root: &Path, path: &str, content: &[u8]) {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }

    fn local_registry() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, REGISTRY_MANIFEST, b"integrations: [query]\ntemplates: [blog]\n");
        write(
            root,
            "query/info.yaml",
            b"id: query\nname: Query\nphase: integration\nwarning: beta\n",
        );
        write(root, "query/assets/src/lib/query.ts.jinja", b"export {}\n");
        write(root, "query/assets/public/logo.png", &[0x89, 0x50, 0xff, 0xfe]);
        write(root, "blog/template.yaml", b"id: blog\nname: Blog\nintegrations: [query]\n");
        write(root, "blog/assets/src/routes/index.tsx", b"blog\n");
        dir
    }

    #[test]
    fn test_build_url_preserves_query() {
        let base = Url::parse("https://example.com/registry?ref=main").unwrap();
        let url = IntegrationFetcher::build_url(&base, "query.zip").unwrap();
        assert_eq!(url.as_str(), "https://example.com/registry/query.zip?ref=main");
    }

    #[test]
    fn test_decode_asset() {
        assert_eq!(decode_asset(b"plain"), "plain");
        assert_eq!(decode_asset(&[0xff, 0xfe]), "base64:://4=");
    }

    #[test]
    fn test_zip_roundtrip_strips_prefix() {
        let dir = local_registry();
        let zip = IntegrationFetcher::build_local_zip(dir.path(), "query").unwrap();
        let bundle = IntegrationFetcher::extract_zip(&zip, "query").unwrap();
        let paths: Vec<&str> = bundle.files.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "assets/public/logo.png",
                "assets/src/lib/query.ts.jinja",
                "info.yaml"
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_local_integration() {
        let dir = local_registry();
        let fetcher = IntegrationFetcher::from_local(dir.path().to_path_buf(), "test");

        let integration = fetcher.fetch_integration("query").await.unwrap();
        assert_eq!(integration.name, "Query");
        assert_eq!(integration.warning.as_deref(), Some("beta"));
        assert_eq!(integration.files["src/lib/query.ts.jinja"], "export {}\n");
        assert!(integration.files["public/logo.png"].starts_with(BINARY_PREFIX));
    }

    #[tokio::test]
    async fn test_resolve_rejects_unknown_id() {
        let dir = local_registry();
        let fetcher = IntegrationFetcher::from_local(dir.path().to_path_buf(), "test");

        let resolved = fetcher
            .resolve_integrations(&["query".to_string()])
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);

        let err = fetcher
            .resolve_integrations(&["query".to_string(), "nope".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown integration 'nope'"));
    }

    #[tokio::test]
    async fn test_resolve_options_from_persisted_config() {
        let dir = local_registry();
        let fetcher = IntegrationFetcher::from_local(dir.path().to_path_buf(), "test");
        let config = PersistedConfig {
            project_name: "demo".to_string(),
            framework: Framework::Solid,
            mode: RouterMode::CodeRouter,
            typescript: false,
            tailwind: true,
            package_manager: PackageManager::Pnpm,
            chosen_integrations: vec!["query".to_string()],
            custom_template: Some("blog".to_string()),
            ..PersistedConfig::default()
        };

        let options = fetcher.resolve_options(&config).await.unwrap();
        assert_eq!(options.project_name, "demo");
        assert_eq!(options.framework, Framework::Solid);
        assert!(!options.typescript);
        assert_eq!(options.chosen_integrations[0].id, "query");
        assert_eq!(options.custom_template.unwrap().name, "Blog");
    }

    #[tokio::test]
    async fn test_missing_bundle_is_an_error() {
        let dir = local_registry();
        let fetcher = IntegrationFetcher::from_local(dir.path().to_path_buf(), "test");
        assert!(fetcher.fetch_integration("absent").await.is_err());
    }
}
