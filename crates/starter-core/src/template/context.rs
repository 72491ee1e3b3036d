//! Per-file template context

use crate::model::{
    CollectedHook, CompileOptions, Framework, Integration, PackageManager, Route, RouterMode,
};
use minijinja::{context, Value};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Everything a template can see while one file is rendered.
///
/// Rebuilt for every file because `relative` and `hook_import` resolve
/// against `file_path`.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// Output path of the file being rendered
    pub file_path: String,
    pub project_name: String,
    pub framework: Framework,
    pub mode: RouterMode,
    pub typescript: bool,
    pub tailwind: bool,
    pub package_manager: PackageManager,
    pub integration_enabled: BTreeMap<String, bool>,
    pub integration_option: BTreeMap<String, BTreeMap<String, JsonValue>>,
    pub integrations: Vec<Integration>,
    pub hooks: Vec<CollectedHook>,
    pub routes: Vec<Route>,
}

impl TemplateContext {
    pub fn new(file_path: &str, options: &CompileOptions) -> Self {
        Self {
            file_path: file_path.to_string(),
            project_name: options.project_name.clone(),
            framework: options.framework,
            mode: options.mode,
            typescript: options.typescript,
            tailwind: options.tailwind,
            package_manager: options.package_manager,
            integration_enabled: options
                .chosen_integrations
                .iter()
                .map(|i| (i.id.clone(), true))
                .collect(),
            integration_option: options.integration_options.clone(),
            integrations: options.chosen_integrations.clone(),
            hooks: options.collect_hooks(),
            routes: options.collect_routes(),
        }
    }

    /// Variables exposed to the template
    pub fn to_value(&self) -> Value {
        context! {
            file_path => self.file_path,
            project_name => self.project_name,
            framework => self.framework.as_str(),
            typescript => self.typescript,
            js => !self.typescript,
            tailwind => self.tailwind,
            package_manager => self.package_manager.as_str(),
            file_router => self.mode == RouterMode::FileRouter,
            code_router => self.mode == RouterMode::CodeRouter,
            integration_enabled => Value::from_serialize(&self.integration_enabled),
            integration_option => Value::from_serialize(&self.integration_option),
            integrations => Value::from_serialize(&self.integrations),
            hooks => Value::from_serialize(&self.hooks),
            routes => Value::from_serialize(&self.routes),
        }
    }
}
