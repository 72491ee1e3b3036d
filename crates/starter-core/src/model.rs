//! Compile input and output types
//!
//! Everything here is request-scoped: a `CompileOptions` is built by the caller,
//! handed to `compile`/`compile_with_attribution`, and the resulting output is
//! owned by the caller. Descriptors are assumed to be validated already (see
//! `registry::manifest`), the engine never re-checks them.

use crate::paths::relative_path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Owner id used for lines and files produced by the base generators
pub const BASE_ID: &str = "base";

/// Priority applied when an integration does not declare one
pub const DEFAULT_PRIORITY: u32 = 100;

/// UI framework the starter targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    React,
    Solid,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Solid => "solid",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::React => "React",
            Framework::Solid => "Solid",
        }
    }
}

/// How routes are declared in the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouterMode {
    #[default]
    FileRouter,
    CodeRouter,
}

impl RouterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouterMode::FileRouter => "file-router",
            RouterMode::CodeRouter => "code-router",
        }
    }
}

/// Package manager the generated project is set up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
    Deno,
}

impl PackageManager {
    pub const ALL: [PackageManager; 5] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
        PackageManager::Deno,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
            PackageManager::Deno => "deno",
        }
    }

    /// Command that adds `package` to the project
    pub fn add_command(&self, package: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm install {}", package),
            PackageManager::Pnpm => format!("pnpm add {}", package),
            PackageManager::Yarn => format!("yarn add {}", package),
            PackageManager::Bun => format!("bun add {}", package),
            _ => format!("deno add npm:{}", package),
        }
    }

    /// Command that runs the package script `script`
    pub fn run_command(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Pnpm => format!("pnpm {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Bun => format!("bun run {}", script),
            _ => format!("deno task {}", script),
        }
    }

    /// Command that installs every declared dependency
    pub fn install_command(&self) -> String {
        format!("{} install", self.as_str())
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, $label:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| format!("Unknown {} '{}'", $label, s))
            }
        }
    };
}

impl_display_from_str!(Framework, "framework", [Framework::React, Framework::Solid]);
impl_display_from_str!(
    RouterMode,
    "router mode",
    [RouterMode::FileRouter, RouterMode::CodeRouter]
);
impl_display_from_str!(
    PackageManager,
    "package manager",
    [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
        PackageManager::Deno,
    ]
);

/// Classification of an integration, used for grouping in the prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationType {
    #[default]
    Integration,
    Example,
    Toolchain,
    Deployment,
}

/// Coarse ordering bucket: setup runs before integration runs before example
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    #[default]
    Integration,
    Example,
}

impl Phase {
    pub fn rank(&self) -> u8 {
        match self {
            Phase::Setup => 0,
            Phase::Integration => 1,
            Phase::Example => 2,
        }
    }
}

/// Which base generator consumes a hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookType {
    VitePlugin,
    RootProvider,
    Devtools,
    EntryClient,
    HeaderUser,
    Layout,
}

/// A code-injection point contributed by an integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    #[serde(rename = "type")]
    pub kind: HookType,

    /// File the injected symbol lives in (virtual path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Symbol exported from `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_name: Option<String>,

    /// Literal import statement, replaces the generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,

    /// Literal call-site code, replaces `<jsName>()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Hook {
    pub fn new(kind: HookType) -> Self {
        Self {
            kind,
            path: None,
            js_name: None,
            import: None,
            code: None,
        }
    }

    /// Import statement for this hook as seen from `from_file`.
    ///
    /// `fallback_path` is used when the hook does not name a file itself.
    pub fn import_from(&self, from_file: &str, fallback_path: Option<&str>) -> Option<String> {
        if let Some(import) = &self.import {
            return Some(import.clone());
        }
        let name = self.js_name.as_deref()?;
        let target = self.path.as_deref().or(fallback_path)?;
        Some(format!(
            "import {} from '{}'",
            name,
            relative_path(from_file, target, true)
        ))
    }

    /// Literal code if given, else the bare symbol
    pub fn code_or_symbol(&self) -> Option<String> {
        self.code.clone().or_else(|| self.js_name.clone())
    }

    /// Literal code if given, else a zero-argument call of the symbol
    pub fn call_site(&self) -> Option<String> {
        self.code
            .clone()
            .or_else(|| self.js_name.as_ref().map(|name| format!("{}()", name)))
    }
}

/// A hook together with the integration that contributed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedHook {
    pub integration_id: String,
    #[serde(flatten)]
    pub hook: Hook,
}

/// A navigation entry contributed by an integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub path: String,
    pub js_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Route>,
}

/// An environment variable the generated project expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Package manifest additions (and the merged result of all of them)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageAdditions {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

impl PackageAdditions {
    /// Merge `other` into this one, later keys win
    pub fn merge(&mut self, other: &PackageAdditions) {
        self.dependencies.extend(other.dependencies.clone());
        self.dev_dependencies.extend(other.dev_dependencies.clone());
        self.scripts.extend(other.scripts.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty() && self.scripts.is_empty()
    }
}

/// Compiled form of an integration descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: IntegrationType,
    #[serde(default)]
    pub phase: Phase,
    /// Router modes this integration supports
    #[serde(default)]
    pub modes: Vec<RouterMode>,
    /// Lower sorts first within a phase
    #[serde(default)]
    pub priority: Option<u32>,
    /// Virtual path -> raw template text
    #[serde(default)]
    pub files: BTreeMap<String, String>,
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
    /// Minimum CLI version this integration was written for
    #[serde(default)]
    pub cli_version: Option<String>,
}

impl Integration {
    pub fn priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    /// Sort key: (phase rank, priority)
    pub fn sort_key(&self) -> (u8, u32) {
        (self.phase.rank(), self.priority())
    }

    pub fn supports(&self, mode: RouterMode) -> bool {
        self.modes.is_empty() || self.modes.contains(&mode)
    }
}

/// A starter that pre-selects integrations and contributes its own files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Integration ids this template selects
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub package_additions: Option<PackageAdditions>,
    #[serde(default)]
    pub deleted_files: Vec<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

impl CustomTemplate {
    /// The template as a contributor that sorts after every integration
    pub fn as_integration(&self) -> Integration {
        Integration {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            kind: IntegrationType::Example,
            phase: Phase::Example,
            priority: Some(u32::MAX),
            files: self.files.clone(),
            deleted_files: self.deleted_files.clone(),
            package_additions: self.package_additions.clone(),
            warning: self.warning.clone(),
            ..Integration::default()
        }
    }
}

/// Input descriptor for one compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    pub project_name: String,
    #[serde(default)]
    pub framework: Framework,
    #[serde(default)]
    pub mode: RouterMode,
    #[serde(default = "default_true")]
    pub typescript: bool,
    #[serde(default)]
    pub tailwind: bool,
    #[serde(default)]
    pub package_manager: PackageManager,
    #[serde(default)]
    pub chosen_integrations: Vec<Integration>,
    /// Integration id -> option name -> value
    #[serde(default)]
    pub integration_options: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    pub custom_template: Option<CustomTemplate>,
}

fn default_true() -> bool {
    true
}

impl CompileOptions {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            framework: Framework::default(),
            mode: RouterMode::default(),
            typescript: true,
            tailwind: false,
            package_manager: PackageManager::default(),
            chosen_integrations: Vec::new(),
            integration_options: BTreeMap::new(),
            custom_template: None,
        }
    }

    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.chosen_integrations.push(integration);
        self
    }

    /// Every hook of the chosen integrations, tagged with its owner, in input order
    pub fn collect_hooks(&self) -> Vec<CollectedHook> {
        self.chosen_integrations
            .iter()
            .flat_map(|integration| {
                integration.hooks.iter().map(|hook| CollectedHook {
                    integration_id: integration.id.clone(),
                    hook: hook.clone(),
                })
            })
            .collect()
    }

    /// Hooks of a single kind, in input order
    pub fn hooks_of(&self, kind: HookType) -> Vec<CollectedHook> {
        self.collect_hooks()
            .into_iter()
            .filter(|h| h.hook.kind == kind)
            .collect()
    }

    /// Every route of the chosen integrations, children flattened depth-first
    pub fn collect_routes(&self) -> Vec<Route> {
        fn walk(routes: &[Route], out: &mut Vec<Route>) {
            for route in routes {
                out.push(route.clone());
                walk(&route.children, out);
            }
        }
        let mut out = Vec::new();
        for integration in &self.chosen_integrations {
            walk(&integration.routes, &mut out);
        }
        out
    }

    /// Source extension for component files (`tsx`/`jsx`)
    pub fn jsx_ext(&self) -> &'static str {
        if self.typescript {
            "tsx"
        } else {
            "jsx"
        }
    }

    /// Source extension for plain modules (`ts`/`js`)
    pub fn js_ext(&self) -> &'static str {
        if self.typescript {
            "ts"
        } else {
            "js"
        }
    }
}

/// Result of a compile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    /// Output path -> final content
    pub files: BTreeMap<String, String>,
    /// Merged integration package additions
    pub packages: PackageAdditions,
    pub env_vars: Vec<EnvVar>,
    pub warnings: Vec<String>,
}

/// Owner of one physical output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAttribution {
    /// 1-indexed
    pub line_number: usize,
    pub feature_id: String,
    pub feature_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedFile {
    pub content: String,
    pub attributions: Vec<LineAttribution>,
}

/// `CompileOutput` plus per-line ownership for every file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedCompileOutput {
    #[serde(flatten)]
    pub output: CompileOutput,
    pub attributed_files: BTreeMap<String, AttributedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_commands_are_distinct() {
        let adds: Vec<String> = PackageManager::ALL
            .iter()
            .map(|pm| pm.add_command("zod"))
            .collect();
        assert_eq!(adds[0], "npm install zod");
        assert_eq!(adds[1], "pnpm add zod");
        assert_eq!(adds[4], "deno add npm:zod");

        let runs: Vec<String> = PackageManager::ALL
            .iter()
            .map(|pm| pm.run_command("dev"))
            .collect();
        assert_eq!(
            runs,
            vec!["npm run dev", "pnpm dev", "yarn dev", "bun run dev", "deno task dev"]
        );
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("PNPM".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert_eq!(
            "code-router".parse::<RouterMode>(),
            Ok(RouterMode::CodeRouter)
        );
        assert!("webpack".parse::<PackageManager>().is_err());
    }

    #[test]
    fn test_hook_import_prefers_literal() {
        let mut hook = Hook::new(HookType::RootProvider);
        hook.js_name = Some("QueryProvider".to_string());
        hook.path = Some("src/integrations/query/provider.tsx".to_string());
        assert_eq!(
            hook.import_from("src/routes/__root.tsx", None).as_deref(),
            Some("import QueryProvider from '../integrations/query/provider'")
        );

        hook.import = Some("import { QueryProvider } from '@acme/query'".to_string());
        assert_eq!(
            hook.import_from("src/routes/__root.tsx", None).as_deref(),
            Some("import { QueryProvider } from '@acme/query'")
        );
    }

    #[test]
    fn test_hook_call_site() {
        let mut hook = Hook::new(HookType::VitePlugin);
        hook.js_name = Some("myPlugin".to_string());
        assert_eq!(hook.call_site().as_deref(), Some("myPlugin()"));
        hook.code = Some("myPlugin({ ssr: true })".to_string());
        assert_eq!(hook.call_site().as_deref(), Some("myPlugin({ ssr: true })"));
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let yaml = r#"
id: query
name: Query
phase: setup
hooks:
  - type: root-provider
    jsName: QueryProvider
    path: src/integrations/query/provider.tsx
"#;
        let integration: Integration = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(integration.priority(), DEFAULT_PRIORITY);
        assert_eq!(integration.sort_key(), (0, 100));
        assert_eq!(integration.hooks[0].kind, HookType::RootProvider);
        assert!(integration.supports(RouterMode::CodeRouter));
    }

    #[test]
    fn test_collect_routes_flattens_children() {
        let child = Route {
            url: "/demo/a".to_string(),
            name: "A".to_string(),
            icon: None,
            path: "src/routes/demo/a.tsx".to_string(),
            js_name: "A".to_string(),
            children: vec![],
        };
        let parent = Route {
            url: "/demo".to_string(),
            name: "Demo".to_string(),
            icon: Some("Home".to_string()),
            path: "src/routes/demo.tsx".to_string(),
            js_name: "Demo".to_string(),
            children: vec![child],
        };
        let options = CompileOptions::new("app").with_integration(Integration {
            id: "demo".to_string(),
            name: "Demo".to_string(),
            routes: vec![parent],
            ..Integration::default()
        });
        let urls: Vec<String> = options.collect_routes().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["/demo", "/demo/a"]);
    }
}
