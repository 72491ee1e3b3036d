//! Ignore file (`.gitignore`)

use super::{GeneratedFile, LineBuilder};
use crate::model::CompileOptions;

const SECTIONS: &[(&str, &[&str])] = &[
    ("# Dependencies", &["node_modules", ".pnp", ".pnp.js"]),
    ("# Build output", &["dist", "dist-ssr", ".output", ".vinxi"]),
    ("# Environment", &[".env", ".env.local", ".env.*.local"]),
    ("# Editor", &[".vscode/*", "!.vscode/extensions.json", ".idea", "*.swp"]),
    ("# OS", &[".DS_Store", "Thumbs.db"]),
    ("# Logs", &["*.log", "npm-debug.log*", "yarn-error.log*", "pnpm-debug.log*"]),
    ("# Generated", &["src/routeTree.gen.ts", ".tanstack"]),
];

pub fn generate(options: &CompileOptions) -> GeneratedFile {
    let mut out = LineBuilder::new();

    for (idx, (heading, patterns)) in SECTIONS.iter().enumerate() {
        if idx > 0 {
            out.blank();
        }
        out.base(heading);
        for pattern in patterns.iter() {
            out.base(pattern);
        }
    }

    let contributed: Vec<(&str, &str)> = options
        .chosen_integrations
        .iter()
        .flat_map(|i| {
            i.gitignore_patterns
                .iter()
                .map(move |p| (i.id.as_str(), p.as_str()))
        })
        .collect();

    if !contributed.is_empty() {
        out.blank();
        out.base("# Integration-specific");
        for (id, pattern) in contributed {
            out.push(pattern, id);
        }
    }
    out.blank();

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Integration, BASE_ID};

    #[test]
    fn test_no_integration_section_without_patterns() {
        let file = generate(&CompileOptions::new("app"));
        assert!(file.content.starts_with("# Dependencies\nnode_modules\n"));
        assert!(!file.content.contains("# Integration-specific"));
        assert!(file.lines.iter().all(|l| l.integration_id == BASE_ID));
    }

    #[test]
    fn test_integration_patterns_are_tagged() {
        let options = CompileOptions::new("app").with_integration(Integration {
            id: "prisma".to_string(),
            name: "Prisma".to_string(),
            gitignore_patterns: vec!["*.db".to_string(), "prisma/migrations/dev".to_string()],
            ..Integration::default()
        });

        let file = generate(&options);
        let lines: Vec<&str> = file.content.split('\n').collect();
        let heading = lines
            .iter()
            .position(|l| *l == "# Integration-specific")
            .unwrap();
        assert_eq!(lines[heading + 1], "*.db");
        assert_eq!(file.lines[heading].integration_id, BASE_ID);
        assert_eq!(file.lines[heading + 1].integration_id, "prisma");
        assert_eq!(file.lines[heading + 2].integration_id, "prisma");
    }
}
