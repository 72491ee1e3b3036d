//! Boilerplate files with no hook injection points

use crate::model::{CompileOptions, Framework, RouterMode};

/// Output path -> content for the static boilerplate of a project
pub fn generate(options: &CompileOptions) -> Vec<(String, String)> {
    let mut files = vec![
        ("index.html".to_string(), index_html(options)),
        ("README.md".to_string(), readme(options)),
        ("src/styles.css".to_string(), styles(options)),
        (
            format!("src/routes/index.{}", options.jsx_ext()),
            index_route(options),
        ),
    ];
    if options.typescript {
        files.push(("tsconfig.json".to_string(), tsconfig(options)));
    }
    files
}

fn index_html(options: &CompileOptions) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{}</title>
  </head>
  <body>
    <div id="app"></div>
    <script type="module" src="/src/main.{}"></script>
  </body>
</html>
"#,
        options.project_name,
        options.jsx_ext()
    )
}

fn readme(options: &CompileOptions) -> String {
    let pm = options.package_manager;
    format!(
        r#"# {name}

Starter project using {framework} and TanStack Router ({mode}).

## Getting started

```bash
{install}
{dev}
```

## Building for production

```bash
{build}
```
"#,
        name = options.project_name,
        framework = options.framework.display_name(),
        mode = options.mode,
        install = pm.install_command(),
        dev = pm.run_command("dev"),
        build = pm.run_command("build"),
    )
}

fn styles(options: &CompileOptions) -> String {
    if options.tailwind {
        "@import \"tailwindcss\";\n".to_string()
    } else {
        r#"body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
  -webkit-font-smoothing: antialiased;
}
"#
        .to_string()
    }
}

fn index_route(options: &CompileOptions) -> String {
    let framework = options.framework.as_str();
    let class_attr = match options.framework {
        Framework::React => "className",
        Framework::Solid => "class",
    };
    let route = match options.mode {
        RouterMode::FileRouter => format!(
            "import {{ createFileRoute }} from '@tanstack/{}-router'\n\n\
             export const Route = createFileRoute('/')({{\n  component: App,\n}})\n",
            framework
        ),
        RouterMode::CodeRouter => format!(
            "import {{ createRoute }} from '@tanstack/{}-router'\n\
             import {{ Route as rootRoute }} from './__root'\n\n\
             export const Route = createRoute({{\n  getParentRoute: () => rootRoute,\n  path: '/',\n  component: App,\n}})\n",
            framework
        ),
    };
    format!(
        "{}\nfunction App() {{\n  return (\n    <main {}=\"app\">\n      <h1>{}</h1>\n    </main>\n  )\n}}\n",
        route, class_attr, options.project_name
    )
}

fn tsconfig(options: &CompileOptions) -> String {
    let jsx = match options.framework {
        Framework::React => r#""jsx": "react-jsx","#,
        Framework::Solid => r#""jsx": "preserve",
    "jsxImportSource": "solid-js","#,
    };
    format!(
        r#"{{
  "include": ["**/*.ts", "**/*.tsx"],
  "compilerOptions": {{
    "target": "ES2022",
    {}
    "module": "ESNext",
    "lib": ["ES2022", "DOM", "DOM.Iterable"],
    "types": ["vite/client"],
    "moduleResolution": "bundler",
    "allowImportingTsExtensions": true,
    "verbatimModuleSyntax": true,
    "noEmit": true,
    "skipLibCheck": true,
    "strict": true,
    "noUnusedLocals": true,
    "noUnusedParameters": true,
    "noFallthroughCasesInSwitch": true
  }}
}}
"#,
        jsx
    )
}
