//! Build-tool config (`vite.config.ts`)

use super::{GeneratedFile, LineBuilder};
use crate::model::{CompileOptions, Framework, HookType, RouterMode};

/// Where a vite plugin hook's symbol lives when the hook names no file
pub fn default_plugin_path(integration_id: &str, typescript: bool) -> String {
    let ext = if typescript { "ts" } else { "js" };
    format!("src/integrations/{}/vite-plugin.{}", integration_id, ext)
}

pub fn generate(options: &CompileOptions) -> GeneratedFile {
    let config_path = format!("vite.config.{}", options.js_ext());
    let hooks = options.hooks_of(HookType::VitePlugin);
    let file_router = options.mode == RouterMode::FileRouter;
    let mut out = LineBuilder::new();

    out.base("import { defineConfig } from 'vite'");
    match options.framework {
        Framework::React => out.base("import viteReact from '@vitejs/plugin-react'"),
        Framework::Solid => out.base("import viteSolid from 'vite-plugin-solid'"),
    }
    if file_router {
        out.base("import { tanstackRouter } from '@tanstack/router-plugin/vite'");
    }
    if options.tailwind {
        out.base("import tailwindcss from '@tailwindcss/vite'");
    }
    for collected in &hooks {
        let fallback = default_plugin_path(&collected.integration_id, options.typescript);
        if let Some(import) = collected.hook.import_from(&config_path, Some(&fallback)) {
            out.push(&import, &collected.integration_id);
        }
    }

    out.blank();
    out.base("// https://vitejs.dev/config/");
    out.base("export default defineConfig({");
    out.base("  plugins: [");
    for collected in &hooks {
        if let Some(call) = collected.hook.call_site() {
            out.push(&format!("    {},", call), &collected.integration_id);
        }
    }
    if file_router {
        out.base(&format!(
            "    tanstackRouter({{ target: '{}', autoCodeSplitting: true }}),",
            options.framework.as_str()
        ));
    }
    match options.framework {
        Framework::React => out.base("    viteReact(),"),
        Framework::Solid => out.base("    viteSolid({ ssr: false }),"),
    }
    if options.tailwind {
        out.base("    tailwindcss(),");
    }
    out.base("  ],");
    out.base("})");
    out.blank();

    out.finish()
}
