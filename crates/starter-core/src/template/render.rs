//! Template rendering through minijinja

use super::context::TemplateContext;
use crate::error::{CompileError, Result};
use crate::generators::vite_config::default_plugin_path;
use crate::model::{CollectedHook, Hook, HookType};
use crate::paths::relative_path;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Message carried by the error `ignore_file()` raises
const SKIP_MESSAGE: &str = "file ignored by template";

/// Outcome of rendering one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Content(String),
    /// The template called `ignore_file()`
    Skipped,
}

/// Render `source` with the helpers and variables of `ctx`.
///
/// `path` is only used for error reporting.
pub fn render_template(path: &str, source: &str, ctx: &TemplateContext) -> Result<Rendered> {
    let skipped = Arc::new(AtomicBool::new(false));
    let env = build_environment(ctx, Arc::clone(&skipped));

    let result = env.render_named_str(path, source, ctx.to_value());

    if skipped.load(Ordering::SeqCst) {
        return Ok(Rendered::Skipped);
    }

    match result {
        Ok(content) => Ok(Rendered::Content(content)),
        Err(err) if err.kind() == ErrorKind::SyntaxError => Err(CompileError::Template {
            path: path.to_string(),
            message: err.to_string(),
        }),
        Err(err) => Err(CompileError::Render {
            path: path.to_string(),
            integration_id: None,
            message: err.to_string(),
        }),
    }
}

fn build_environment(ctx: &TemplateContext, skipped: Arc<AtomicBool>) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Lenient);

    let from = ctx.file_path.clone();
    env.add_function("relative", move |path: String, strip_ext: Option<bool>| {
        relative_path(&from, &path, strip_ext.unwrap_or(false))
    });

    let pm = ctx.package_manager;
    env.add_function("pm_add", move |package: String| pm.add_command(&package));
    env.add_function("pm_run", move |script: String| pm.run_command(&script));

    let from = ctx.file_path.clone();
    let typescript = ctx.typescript;
    env.add_function("hook_import", move |hook: Value| -> std::result::Result<String, Error> {
        let collected = hook_from_value(&hook)?;
        let fallback = (collected.hook.kind == HookType::VitePlugin)
            .then(|| default_plugin_path(&collected.integration_id, typescript));
        Ok(collected
            .hook
            .import_from(&from, fallback.as_deref())
            .unwrap_or_default())
    });

    env.add_function("hook_code", |hook: Value| -> std::result::Result<String, Error> {
        Ok(hook_from_value(&hook)?
            .hook
            .code_or_symbol()
            .unwrap_or_default())
    });

    env.add_function("ignore_file", move || -> std::result::Result<Value, Error> {
        skipped.store(true, Ordering::SeqCst);
        Err(Error::new(ErrorKind::InvalidOperation, SKIP_MESSAGE))
    });

    env
}

/// Rebuild a hook (and its owner, when present) from a template value
fn hook_from_value(value: &Value) -> std::result::Result<CollectedHook, Error> {
    let json = serde_json::to_value(value)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("not a hook: {}", e)))?;
    let integration_id = json
        .get("integrationId")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let hook: Hook = serde_json::from_value(json)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, format!("not a hook: {}", e)))?;
    Ok(CollectedHook {
        integration_id,
        hook,
    })
}
