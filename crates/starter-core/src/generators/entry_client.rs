//! App entry point (`src/main.tsx`)

use super::{GeneratedFile, LineBuilder};
use crate::model::{CompileOptions, Framework, HookType, RouterMode};

pub fn generate(options: &CompileOptions) -> GeneratedFile {
    let entry_path = format!("src/main.{}", options.jsx_ext());
    let hooks = options.hooks_of(HookType::EntryClient);
    let router_pkg = format!("@tanstack/{}-router", options.framework.as_str());
    let mut out = LineBuilder::new();

    match options.framework {
        Framework::React => {
            out.base("import { StrictMode } from 'react'");
            out.base("import ReactDOM from 'react-dom/client'");
        }
        Framework::Solid => out.base("import { render } from 'solid-js/web'"),
    }
    out.base(&format!(
        "import {{ RouterProvider, createRouter }} from '{}'",
        router_pkg
    ));
    for collected in &hooks {
        if let Some(import) = collected.hook.import_from(&entry_path, None) {
            out.push(&import, &collected.integration_id);
        }
    }
    out.blank();

    match options.mode {
        RouterMode::FileRouter => out.base("import { routeTree } from './routeTree.gen'"),
        RouterMode::CodeRouter => {
            out.base("import { Route as rootRoute } from './routes/__root'");
            out.base("import { Route as indexRoute } from './routes/index'");
        }
    }
    out.base("import './styles.css'");
    out.blank();

    if !hooks.is_empty() {
        for collected in &hooks {
            if let Some(call) = collected.hook.call_site() {
                out.push(&call, &collected.integration_id);
            }
        }
        out.blank();
    }

    if options.mode == RouterMode::CodeRouter {
        out.base("const routeTree = rootRoute.addChildren([indexRoute])");
        out.blank();
    }
    out.base("const router = createRouter({");
    out.base("  routeTree,");
    out.base("  defaultPreload: 'intent',");
    out.base("  scrollRestoration: true,");
    out.base("})");
    out.blank();

    if options.typescript {
        out.base(&format!("declare module '{}' {{", router_pkg));
        out.base("  interface Register {");
        out.base("    router: typeof router");
        out.base("  }");
        out.base("}");
        out.blank();
    }

    out.base("const rootElement = document.getElementById('app')");
    match options.framework {
        Framework::React => {
            out.base("if (rootElement && !rootElement.innerHTML) {");
            out.base("  const root = ReactDOM.createRoot(rootElement)");
            out.base("  root.render(");
            out.base("    <StrictMode>");
            out.base("      <RouterProvider router={router} />");
            out.base("    </StrictMode>,");
            out.base("  )");
            out.base("}");
        }
        Framework::Solid => {
            out.base("if (rootElement) {");
            out.base("  render(() => <RouterProvider router={router} />, rootElement)");
            out.base("}");
        }
    }
    out.blank();

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hook, Integration, BASE_ID};

    #[test]
    fn test_no_hooks_no_setup_block() {
        let file = generate(&CompileOptions::new("app"));
        assert!(file.content.contains("import { routeTree } from './routeTree.gen'"));
        assert!(file.content.contains("declare module '@tanstack/react-router'"));
        assert!(file.lines.iter().all(|l| l.integration_id == BASE_ID));
    }

    #[test]
    fn test_entry_hooks_are_imported_and_called() {
        let mut hook = Hook::new(HookType::EntryClient);
        hook.js_name = Some("initSentry".to_string());
        hook.path = Some("src/integrations/sentry/init.ts".to_string());
        let options = CompileOptions::new("app").with_integration(Integration {
            id: "sentry".to_string(),
            name: "Sentry".to_string(),
            hooks: vec![hook],
            ..Integration::default()
        });

        let file = generate(&options);
        let lines: Vec<&str> = file.content.split('\n').collect();
        let import_idx = lines
            .iter()
            .position(|l| *l == "import initSentry from './integrations/sentry/init'")
            .unwrap();
        let call_idx = lines.iter().position(|l| *l == "initSentry()").unwrap();
        let router_idx = lines
            .iter()
            .position(|l| *l == "const router = createRouter({")
            .unwrap();

        assert!(import_idx < call_idx && call_idx < router_idx);
        assert_eq!(file.lines[import_idx].integration_id, "sentry");
        assert_eq!(file.lines[call_idx].integration_id, "sentry");
        assert_eq!(file.lines[router_idx].integration_id, BASE_ID);
    }

    #[test]
    fn test_code_router_solid_javascript() {
        let mut options = CompileOptions::new("app");
        options.mode = RouterMode::CodeRouter;
        options.framework = Framework::Solid;
        options.typescript = false;

        let file = generate(&options);
        assert!(file
            .content
            .contains("const routeTree = rootRoute.addChildren([indexRoute])"));
        assert!(file.content.contains("render(() => <RouterProvider router={router} />"));
        assert!(!file.content.contains("declare module"));
    }
}
