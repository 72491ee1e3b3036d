//! Base generators
//!
//! Every generator builds its output as an ordered list of tagged lines. The
//! content is the lines joined with `\n`; the line owners fall out of the same
//! list, so content and attribution cannot drift apart.

pub mod entry_client;
pub mod gitignore;
pub mod package_json;
pub mod root_route;
pub mod static_files;
pub mod vite_config;

use crate::model::{CompileOptions, PackageAdditions, BASE_ID};
use std::collections::BTreeMap;

/// One output line and the contributor responsible for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub text: String,
    pub integration_id: String,
}

/// Owner of a 1-indexed line in a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOwner {
    pub line: usize,
    pub integration_id: String,
}

/// Accumulates tagged lines
#[derive(Debug, Default)]
pub struct LineBuilder {
    lines: Vec<TaggedLine>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `text` owned by `integration_id`; embedded newlines become separate lines
    pub fn push(&mut self, text: &str, integration_id: &str) {
        for line in text.split('\n') {
            self.lines.push(TaggedLine {
                text: line.to_string(),
                integration_id: integration_id.to_string(),
            });
        }
    }

    /// Push structural text owned by the base template
    pub fn base(&mut self, text: &str) {
        self.push(text, BASE_ID);
    }

    pub fn blank(&mut self) {
        self.base("");
    }

    pub fn finish(self) -> GeneratedFile {
        let content = self
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let lines = self
            .lines
            .into_iter()
            .enumerate()
            .map(|(idx, l)| LineOwner {
                line: idx + 1,
                integration_id: l.integration_id,
            })
            .collect();
        GeneratedFile { content, lines }
    }
}

/// Output of a generator: the text plus one owner per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub content: String,
    pub lines: Vec<LineOwner>,
}

impl GeneratedFile {
    /// A file whose every line belongs to the base template
    pub fn base(content: &str) -> Self {
        let mut builder = LineBuilder::new();
        builder.base(content);
        builder.finish()
    }

    /// Owner of `line` when it is not the base template
    pub fn hook_owner(&self, line: usize) -> Option<&str> {
        self.lines
            .get(line.checked_sub(1)?)
            .map(|l| l.integration_id.as_str())
            .filter(|id| *id != BASE_ID)
    }
}

/// The foundational files of a project plus their line owners
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseFiles {
    pub files: BTreeMap<String, String>,
    pub attributions: BTreeMap<String, Vec<LineOwner>>,
}

impl BaseFiles {
    fn insert(&mut self, path: String, generated: GeneratedFile) {
        self.files.insert(path.clone(), generated.content);
        self.attributions.insert(path, generated.lines);
    }
}

/// Foundational files for one compile, content only
pub fn get_base_files(options: &CompileOptions) -> BTreeMap<String, String> {
    get_base_files_with_attribution(options).files
}

/// Foundational files for one compile with per-line owners
pub fn get_base_files_with_attribution(options: &CompileOptions) -> BaseFiles {
    let mut base = BaseFiles::default();
    let jsx = options.jsx_ext();

    base.insert(
        "package.json".to_string(),
        GeneratedFile::base(&package_json::render_package_json(
            options,
            &PackageAdditions::default(),
        )),
    );
    base.insert(
        format!("vite.config.{}", options.js_ext()),
        vite_config::generate(options),
    );
    base.insert(format!("src/main.{}", jsx), entry_client::generate(options));
    base.insert(
        format!("src/routes/__root.{}", jsx),
        root_route::generate(options),
    );
    base.insert(".gitignore".to_string(), gitignore::generate(options));

    for (path, content) in static_files::generate(options) {
        base.insert(path, GeneratedFile::base(&content));
    }

    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hook, HookType, Integration};

    #[test]
    fn test_builder_splits_multiline_text() {
        let mut builder = LineBuilder::new();
        builder.base("a");
        builder.push("b\nc", "query");
        let file = builder.finish();
        assert_eq!(file.content, "a\nb\nc");
        assert_eq!(file.lines.len(), 3);
        assert_eq!(file.hook_owner(1), None);
        assert_eq!(file.hook_owner(3), Some("query"));
        assert_eq!(file.hook_owner(0), None);
        assert_eq!(file.hook_owner(4), None);
    }

    #[test]
    fn test_base_file_set_typescript() {
        let files = get_base_files(&CompileOptions::new("app"));
        let paths: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                ".gitignore",
                "README.md",
                "index.html",
                "package.json",
                "src/main.tsx",
                "src/routes/__root.tsx",
                "src/routes/index.tsx",
                "src/styles.css",
                "tsconfig.json",
                "vite.config.ts",
            ]
        );
    }

    #[test]
    fn test_base_file_set_javascript() {
        let mut options = CompileOptions::new("app");
        options.typescript = false;
        let files = get_base_files(&options);
        assert!(files.contains_key("src/main.jsx"));
        assert!(files.contains_key("vite.config.js"));
        assert!(!files.contains_key("tsconfig.json"));
    }

    #[test]
    fn test_attribution_variant_matches_content() {
        let mut plugin = Hook::new(HookType::VitePlugin);
        plugin.js_name = Some("myPlugin".to_string());
        let options = CompileOptions::new("app").with_integration(Integration {
            id: "plugin".to_string(),
            name: "Plugin".to_string(),
            hooks: vec![plugin],
            ..Integration::default()
        });

        let plain = get_base_files(&options);
        let attributed = get_base_files_with_attribution(&options);
        assert_eq!(plain, attributed.files);

        for (path, content) in &attributed.files {
            let owners = &attributed.attributions[path];
            assert_eq!(content.split('\n').count(), owners.len(), "{}", path);
        }
    }
}
