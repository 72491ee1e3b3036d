//! Runtime detection for Node.js and the chosen package manager

use crate::model::PackageManager;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
    /// Where to get it when missing
    pub install_hint: &'static str,
}

fn probe(command: &str, name: &'static str, install_hint: &'static str) -> RuntimeInfo {
    let output = Command::new(command).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
                install_hint,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
            install_hint,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("node", "Node.js", "https://nodejs.org")
}

/// Check if the package manager binary is available
pub fn check_package_manager(pm: PackageManager) -> RuntimeInfo {
    match pm {
        PackageManager::Npm => probe("npm", "npm", "https://nodejs.org"),
        PackageManager::Pnpm => probe("pnpm", "pnpm", "https://pnpm.io/installation"),
        PackageManager::Yarn => probe("yarn", "Yarn", "https://yarnpkg.com/getting-started/install"),
        PackageManager::Bun => probe("bun", "Bun", "https://bun.sh"),
        PackageManager::Deno => probe("deno", "Deno", "https://deno.com"),
    }
}

/// Whether the package manager runs on top of Node.js
fn needs_node(pm: PackageManager) -> bool {
    matches!(
        pm,
        PackageManager::Npm | PackageManager::Pnpm | PackageManager::Yarn
    )
}

/// Check the tools needed to work with a project using `pm`.
/// Results are advisory; a missing tool is reported, never an error.
pub fn check_runtimes(pm: PackageManager) -> Vec<RuntimeInfo> {
    let mut results = Vec::new();
    if needs_node(pm) {
        results.push(check_node());
    }
    results.push(check_package_manager(pm));

    for info in &results {
        match &info.version {
            Some(version) => tracing::debug!("Found {} {}", info.name, version),
            None => tracing::debug!("{} not found", info.name),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_reported() {
        let info = probe("definitely-not-a-real-tool-4821", "Nope", "https://example.com");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert_eq!(info.install_hint, "https://example.com");
    }

    #[test]
    fn test_node_only_for_node_based_managers() {
        assert!(needs_node(PackageManager::Pnpm));
        assert!(!needs_node(PackageManager::Bun));
        assert!(!needs_node(PackageManager::Deno));
    }

    #[test]
    fn test_check_runtimes_lists_package_manager_last() {
        let results = check_runtimes(PackageManager::Yarn);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Node.js");
        assert_eq!(results[1].name, "Yarn");

        let results = check_runtimes(PackageManager::Deno);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Deno");
    }
}
