//! Package manifest (`package.json`)

use crate::model::{CompileOptions, Framework, PackageAdditions, RouterMode};
use serde::Serialize;
use std::collections::BTreeMap;

const ROUTER_VERSION: &str = "^1.132.0";
const DEVTOOLS_VERSION: &str = "^0.7.0";
const VITE_VERSION: &str = "^7.1.7";
const TAILWIND_VERSION: &str = "^4.1.13";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson<'a> {
    name: &'a str,
    private: bool,
    #[serde(rename = "type")]
    module_type: &'static str,
    scripts: BTreeMap<String, String>,
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
}

/// Dependencies, dev dependencies and scripts every project starts with
pub fn baseline(options: &CompileOptions) -> PackageAdditions {
    let framework = options.framework.as_str();
    let mut base = PackageAdditions::default();

    let mut dep = |name: String, version: &str| {
        base.dependencies.insert(name, version.to_string());
    };
    dep(format!("@tanstack/{}-router", framework), ROUTER_VERSION);
    dep(format!("@tanstack/{}-router-devtools", framework), ROUTER_VERSION);
    dep(format!("@tanstack/{}-devtools", framework), DEVTOOLS_VERSION);
    if options.mode == RouterMode::FileRouter {
        dep("@tanstack/router-plugin".to_string(), ROUTER_VERSION);
    }
    match options.framework {
        Framework::React => {
            dep("react".to_string(), "^19.0.0");
            dep("react-dom".to_string(), "^19.0.0");
        }
        Framework::Solid => dep("solid-js".to_string(), "^1.9.5"),
    }

    let dev = &mut base.dev_dependencies;
    dev.insert("vite".to_string(), VITE_VERSION.to_string());
    match options.framework {
        Framework::React => {
            dev.insert("@vitejs/plugin-react".to_string(), "^5.0.4".to_string());
            if options.typescript {
                dev.insert("@types/react".to_string(), "^19.0.8".to_string());
                dev.insert("@types/react-dom".to_string(), "^19.0.3".to_string());
            }
        }
        Framework::Solid => {
            dev.insert("vite-plugin-solid".to_string(), "^2.11.2".to_string());
        }
    }
    if options.typescript {
        dev.insert("typescript".to_string(), "^5.7.2".to_string());
    }

    base.scripts
        .insert("dev".to_string(), "vite --port 3000".to_string());
    let build = if options.typescript {
        "vite build && tsc"
    } else {
        "vite build"
    };
    base.scripts.insert("build".to_string(), build.to_string());
    base.scripts
        .insert("start".to_string(), "vite preview".to_string());

    base
}

/// Dependencies injected when tailwind is on and at least one integration was chosen
pub fn tailwind_dependencies() -> BTreeMap<String, String> {
    [
        ("tailwindcss", TAILWIND_VERSION),
        ("@tailwindcss/vite", TAILWIND_VERSION),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Render the manifest: baseline, then `packages` on top (later keys win)
pub fn render_package_json(options: &CompileOptions, packages: &PackageAdditions) -> String {
    let mut merged = baseline(options);
    if options.tailwind && !options.chosen_integrations.is_empty() {
        merged.dependencies.extend(tailwind_dependencies());
    }
    merged.merge(packages);

    let manifest = PackageJson {
        name: &options.project_name,
        private: true,
        module_type: "module",
        scripts: merged.scripts,
        dependencies: merged.dependencies,
        dev_dependencies: merged.dev_dependencies,
    };

    // Serializing a struct of strings and string maps cannot fail
    let json = serde_json::to_string_pretty(&manifest).unwrap_or_default();
    format!("{}\n", json)
}
