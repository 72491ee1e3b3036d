//! Version comparison for CLI and integration compatibility

use crate::model::Integration;
use semver::Version;

/// Parse a version string, tolerating a leading `v`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}

/// Compare the CLI version against the version an integration was written for.
/// Returns a warning message if the CLI is older than the integration expects.
pub fn check_compatibility(
    cli_version: &str,
    integration: &Integration,
    upgrade_command: &str,
) -> Option<String> {
    let wanted = integration.cli_version.as_deref()?;
    let cli_ver = parse_version(cli_version)?;
    let wanted_ver = parse_version(wanted)?;

    if cli_ver < wanted_ver {
        Some(format!(
            "{} was designed for CLI version {} or newer (running {}). Consider updating: {}",
            integration.name, wanted, cli_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Compatibility warnings for a set of integrations, in order
pub fn compatibility_warnings(
    cli_version: &str,
    integrations: &[Integration],
    upgrade_command: &str,
) -> Vec<String> {
    integrations
        .iter()
        .filter_map(|i| check_compatibility(cli_version, i, upgrade_command))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wanting(version: &str) -> Integration {
        Integration {
            id: "query".to_string(),
            name: "Query".to_string(),
            cli_version: Some(version.to_string()),
            ..Integration::default()
        }
    }

    #[test]
    fn test_cli_older_than_integration() {
        let warning = check_compatibility("0.1.0", &wanting("0.2.0"), "cargo install create-starter --force");
        assert!(warning.is_some());
        assert!(warning.unwrap().contains("0.2.0"));
    }

    #[test]
    fn test_cli_same_or_newer() {
        assert!(check_compatibility("0.2.0", &wanting("0.2.0"), "upgrade").is_none());
        assert!(check_compatibility("0.3.1", &wanting("v0.2.0"), "upgrade").is_none());
    }

    #[test]
    fn test_invalid_or_missing_versions() {
        assert!(check_compatibility("invalid", &wanting("0.1.0"), "upgrade").is_none());
        assert!(check_compatibility("0.1.0", &wanting("latest"), "upgrade").is_none());

        let mut unversioned = wanting("0.1.0");
        unversioned.cli_version = None;
        assert!(check_compatibility("0.0.1", &unversioned, "upgrade").is_none());
    }

    #[test]
    fn test_warnings_for_many() {
        let warnings = compatibility_warnings("0.1.0", &[wanting("0.5.0"), wanting("0.1.0")], "upgrade");
        assert_eq!(warnings.len(), 1);
    }
}
