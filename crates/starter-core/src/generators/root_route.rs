//! Root layout (`src/routes/__root.tsx`)
//!
//! Provider hooks wrap the page in declaration order, so the first provider is
//! the outermost element. A provider's tag is its literal `code` when given,
//! else its `jsName`. Devtools hooks become plugin entries next to the
//! built-in router panel.

use super::{GeneratedFile, LineBuilder};
use crate::model::{CompileOptions, Framework, HookType};

pub fn generate(options: &CompileOptions) -> GeneratedFile {
    let root_path = format!("src/routes/__root.{}", options.jsx_ext());
    let framework = options.framework.as_str();
    let providers: Vec<_> = options
        .hooks_of(HookType::RootProvider)
        .into_iter()
        .filter_map(|h| Some((h.hook.code_or_symbol()?, h)))
        .collect();
    let devtools = options.hooks_of(HookType::Devtools);
    let mut out = LineBuilder::new();

    out.base(&format!(
        "import {{ Outlet, createRootRoute }} from '@tanstack/{}-router'",
        framework
    ));
    out.base(&format!(
        "import {{ TanStackRouterDevtoolsPanel }} from '@tanstack/{}-router-devtools'",
        framework
    ));
    out.base(&format!(
        "import {{ TanStackDevtools }} from '@tanstack/{}-devtools'",
        framework
    ));
    for collected in providers.iter().map(|(_, h)| h).chain(devtools.iter()) {
        if let Some(import) = collected.hook.import_from(&root_path, None) {
            out.push(&import, &collected.integration_id);
        }
    }
    out.blank();

    out.base("export const Route = createRootRoute({");
    out.base("  component: RootComponent,");
    out.base("})");
    out.blank();

    out.base("function RootComponent() {");
    out.base("  return (");
    out.base("    <>");

    let mut depth = 3;
    for (tag, collected) in &providers {
        out.push(
            &format!("{}<{}>", indent(depth), tag),
            &collected.integration_id,
        );
        depth += 1;
    }

    out.base(&format!("{}<Outlet />", indent(depth)));
    out.base(&format!("{}<TanStackDevtools", indent(depth)));
    out.base(&format!(
        "{}config={{{{ position: 'bottom-right' }}}}",
        indent(depth + 1)
    ));
    out.base(&format!("{}plugins={{[", indent(depth + 1)));
    out.base(&format!("{}{{", indent(depth + 2)));
    out.base(&format!("{}name: 'TanStack Router',", indent(depth + 3)));
    match options.framework {
        Framework::React => out.base(&format!(
            "{}render: <TanStackRouterDevtoolsPanel />,",
            indent(depth + 3)
        )),
        Framework::Solid => out.base(&format!(
            "{}render: () => <TanStackRouterDevtoolsPanel />,",
            indent(depth + 3)
        )),
    }
    out.base(&format!("{}}},", indent(depth + 2)));
    for collected in &devtools {
        if let Some(entry) = collected.hook.code_or_symbol() {
            out.push(
                &format!("{}{},", indent(depth + 2), entry),
                &collected.integration_id,
            );
        }
    }
    out.base(&format!("{}]}}", indent(depth + 1)));
    out.base(&format!("{}/>", indent(depth)));

    for (tag, collected) in providers.iter().rev() {
        depth -= 1;
        out.push(
            &format!("{}</{}>", indent(depth), tag),
            &collected.integration_id,
        );
    }

    out.base("    </>");
    out.base("  )");
    out.base("}");
    out.blank();

    out.finish()
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
