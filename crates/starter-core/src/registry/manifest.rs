//! Registry manifest types and descriptor validation

use crate::model::{
    CustomTemplate, EnvVar, Hook, HookType, Integration, IntegrationType, PackageAdditions, Phase,
    Route, RouterMode,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root registry manifest (`registry.yaml`)
/// Lists the integrations and custom templates a registry provides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Integration directory names
    #[serde(default)]
    pub integrations: Vec<String>,

    /// Custom template directory names
    #[serde(default)]
    pub templates: Vec<String>,
}

/// Per-integration descriptor (`<id>/info.yaml`)
///
/// Mirrors `Integration` minus the file contents, which come from the
/// integration's `assets/` tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: IntegrationType,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub modes: Vec<RouterMode>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub deleted_files: Vec<String>,
    #[serde(default)]
    pub package_additions: Option<PackageAdditions>,
    #[serde(default)]
    pub hooks: Vec<Hook>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub gitignore_patterns: Vec<String>,
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub cli_version: Option<String>,
}

impl IntegrationInfo {
    /// Check the descriptor and attach its files
    pub fn into_integration(
        self,
        expected_id: &str,
        files: BTreeMap<String, String>,
    ) -> Result<Integration> {
        self.validate(expected_id)?;
        Ok(Integration {
            id: self.id,
            name: self.name,
            description: self.description,
            kind: self.kind,
            phase: self.phase,
            modes: self.modes,
            priority: self.priority,
            files,
            deleted_files: self.deleted_files,
            package_additions: self.package_additions,
            hooks: self.hooks,
            routes: self.routes,
            gitignore_patterns: self.gitignore_patterns,
            env_vars: self.env_vars,
            warning: self.warning,
            cli_version: self.cli_version,
        })
    }

    fn validate(&self, expected_id: &str) -> Result<()> {
        if self.id.trim().is_empty() {
            anyhow::bail!("Integration '{}' has an empty id", expected_id);
        }
        if self.id != expected_id {
            anyhow::bail!(
                "Integration '{}' declares a different id: '{}'",
                expected_id,
                self.id
            );
        }
        if self.name.trim().is_empty() {
            anyhow::bail!("Integration '{}' has an empty name", self.id);
        }
        for (idx, hook) in self.hooks.iter().enumerate() {
            let consumed = matches!(
                hook.kind,
                HookType::VitePlugin
                    | HookType::RootProvider
                    | HookType::Devtools
                    | HookType::EntryClient
            );
            if consumed && hook.js_name.is_none() && hook.code.is_none() {
                anyhow::bail!(
                    "Integration '{}' hook #{} ({:?}) needs a jsName or code",
                    self.id,
                    idx + 1,
                    hook.kind
                );
            }
        }
        Ok(())
    }
}

/// Custom template descriptor (`<id>/template.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub package_additions: Option<PackageAdditions>,
    #[serde(default)]
    pub deleted_files: Vec<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

impl TemplateInfo {
    pub fn into_template(
        self,
        expected_id: &str,
        files: BTreeMap<String, String>,
    ) -> Result<CustomTemplate> {
        if self.id != expected_id {
            anyhow::bail!(
                "Template '{}' declares a different id: '{}'",
                expected_id,
                self.id
            );
        }
        if self.name.trim().is_empty() {
            anyhow::bail!("Template '{}' has an empty name", self.id);
        }
        Ok(CustomTemplate {
            id: self.id,
            name: self.name,
            description: self.description,
            integrations: self.integrations,
            files,
            package_additions: self.package_additions,
            deleted_files: self.deleted_files,
            warning: self.warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> IntegrationInfo {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_descriptor() {
        let info = parse(
            r#"
id: query
name: TanStack Query
phase: integration
modes: [file-router, code-router]
hooks:
  - type: root-provider
    jsName: QueryProvider
    path: src/integrations/query/root-provider.tsx
envVars:
  - name: API_URL
    description: Backend url
"#,
        );
        let files: BTreeMap<String, String> =
            [("src/a.ts".to_string(), "x".to_string())].into_iter().collect();
        let integration = info.into_integration("query", files).unwrap();
        assert_eq!(integration.name, "TanStack Query");
        assert_eq!(integration.files.len(), 1);
        assert_eq!(integration.env_vars[0].name, "API_URL");
    }

    #[test]
    fn test_id_mismatch_rejected() {
        let info = parse("id: other\nname: Other\n");
        let err = info.into_integration("query", BTreeMap::new()).unwrap_err();
        assert!(err.to_string().contains("different id"));
    }

    #[test]
    fn test_hook_without_symbol_rejected() {
        let info = parse(
            r#"
id: plugin
name: Plugin
hooks:
  - type: vite-plugin
"#,
        );
        let err = info.into_integration("plugin", BTreeMap::new()).unwrap_err();
        assert!(err.to_string().contains("needs a jsName or code"));
    }

    #[test]
    fn test_unused_hook_types_need_nothing() {
        let info = parse(
            r#"
id: header
name: Header
hooks:
  - type: header-user
"#,
        );
        assert!(info.into_integration("header", BTreeMap::new()).is_ok());
    }

    #[test]
    fn test_root_manifest_defaults() {
        let manifest: RegistryManifest = serde_yaml::from_str("integrations: [query]\n").unwrap();
        assert_eq!(manifest.integrations, vec!["query"]);
        assert!(manifest.templates.is_empty());
    }

    #[test]
    fn test_template_descriptor() {
        let info: TemplateInfo =
            serde_yaml::from_str("id: blog\nname: Blog\nintegrations: [query]\n").unwrap();
        let template = info.into_template("blog", BTreeMap::new()).unwrap();
        assert_eq!(template.integrations, vec!["query"]);
    }
}
