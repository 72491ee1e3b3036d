//! Product configuration trait for CLI binaries
//!
//! A binary implements this trait to tell the library who it is and where
//! its integration registry lives.

use crate::model::PackageManager;
use std::path::Path;

/// Configuration trait for a starter CLI product
///
/// Defines:
/// - Product identity (name, display name)
/// - Registry location and its override variable
/// - Documentation and upgrade links
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default URL of the integration registry
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// The "next steps" shown after project creation
    fn next_steps(&self, dir: &Path, package_manager: PackageManager) -> Vec<String> {
        let mut steps = Vec::new();
        if let Some(name) = dir.file_name() {
            steps.push(format!("cd {}", name.to_string_lossy()));
        }
        steps.push(package_manager.install_command());
        steps.push(package_manager.run_command("dev"));
        steps.push(format!("Docs: {}", self.docs_url()));
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Demo;

    impl ProductConfig for Demo {
        fn name(&self) -> &'static str {
            "demo"
        }
        fn display_name(&self) -> &'static str {
            "Demo"
        }
        fn default_registry_url(&self) -> &'static str {
            "https://example.com"
        }
        fn registry_url_env(&self) -> &'static str {
            "DEMO_REGISTRY_URL"
        }
        fn docs_url(&self) -> &'static str {
            "https://example.com/docs"
        }
        fn cli_description(&self) -> &'static str {
            "demo"
        }
        fn upgrade_command(&self) -> &'static str {
            "upgrade"
        }
    }

    #[test]
    fn test_default_next_steps() {
        let steps = Demo.next_steps(Path::new("/tmp/my-app"), PackageManager::Pnpm);
        assert_eq!(
            steps,
            vec![
                "cd my-app",
                "pnpm install",
                "pnpm dev",
                "Docs: https://example.com/docs"
            ]
        );
        assert_eq!(Demo.user_agent(), "demo");
    }
}
