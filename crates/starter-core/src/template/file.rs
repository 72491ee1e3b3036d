//! Single-file template processing

use super::context::TemplateContext;
use super::render::{render_template, Rendered};
use crate::error::Result;
use crate::model::CompileOptions;
use crate::paths::{
    convert_dot_files, strip_append_suffix, strip_option_prefix, to_javascript_extension,
};

/// Extension that marks a file as a template
pub const TEMPLATE_EXTENSION: &str = ".jinja";

/// Prefix marking a base64-encoded binary payload
pub const BINARY_PREFIX: &str = "base64::";

/// A file after template processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub path: String,
    pub content: String,
    /// Append to the existing file instead of replacing it
    pub append: bool,
}

/// Compute the output path of a virtual template path
pub fn output_path(path: &str, options: &CompileOptions) -> (String, bool) {
    let path = path.strip_suffix(TEMPLATE_EXTENSION).unwrap_or(path);
    let path = convert_dot_files(path);
    let path = strip_option_prefix(&path);
    let (path, append) = strip_append_suffix(&path);
    let path = if options.typescript {
        path
    } else {
        to_javascript_extension(&path)
    };
    (path, append)
}

/// Render one contributed file and work out where it lands.
///
/// Returns `Ok(None)` when the template asked to be skipped. Any other render
/// failure is returned as an error naming `path`.
pub fn process_template_file(
    path: &str,
    content: &str,
    options: &CompileOptions,
) -> Result<Option<ProcessedFile>> {
    let (target, append) = output_path(path, options);

    let content = if path.ends_with(TEMPLATE_EXTENSION) && !content.starts_with(BINARY_PREFIX) {
        let ctx = TemplateContext::new(&target, options);
        match render_template(path, content, &ctx)? {
            Rendered::Content(rendered) => rendered,
            Rendered::Skipped => {
                tracing::debug!("Template {} skipped itself", path);
                return Ok(None);
            }
        }
    } else {
        content.to_string()
    };

    Ok(Some(ProcessedFile {
        path: target,
        content,
        append,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;

    #[test]
    fn test_plain_file_passes_through() {
        let options = CompileOptions::new("app");
        let file = process_template_file("src/lib/util.ts", "export {}", &options)
            .unwrap()
            .unwrap();
        assert_eq!(file.path, "src/lib/util.ts");
        assert_eq!(file.content, "export {}");
        assert!(!file.append);
    }

    #[test]
    fn test_template_path_transforms() {
        let options = CompileOptions::new("app");
        let file = process_template_file("_dot_gitignore.append.jinja", "{{ project_name }}", &options)
            .unwrap()
            .unwrap();
        assert_eq!(file.path, ".gitignore");
        assert_eq!(file.content, "app");
        assert!(file.append);

        let file = process_template_file("prisma/__postgres__schema.prisma.jinja", "x", &options)
            .unwrap()
            .unwrap();
        assert_eq!(file.path, "prisma/schema.prisma");
    }

    #[test]
    fn test_javascript_projects_rename_extensions() {
        let mut options = CompileOptions::new("app");
        options.typescript = false;
        let file = process_template_file("src/routes/demo.tsx.jinja", "x", &options)
            .unwrap()
            .unwrap();
        assert_eq!(file.path, "src/routes/demo.jsx");

        let file = process_template_file("src/lib/db.ts", "x", &options)
            .unwrap()
            .unwrap();
        assert_eq!(file.path, "src/lib/db.js");
    }

    #[test]
    fn test_skip_signal_returns_none() {
        let options = CompileOptions::new("app");
        let result =
            process_template_file("src/tw.css.jinja", "{% if not tailwind %}{{ ignore_file() }}{% endif %}", &options)
                .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_render_failure_names_file() {
        let options = CompileOptions::new("app");
        let err = process_template_file("src/bad.tsx.jinja", "{{ nope() }}", &options).unwrap_err();
        assert!(matches!(err, CompileError::Render { ref path, .. } if path == "src/bad.tsx.jinja"));
    }

    #[test]
    fn test_binary_payload_is_not_rendered() {
        let options = CompileOptions::new("app");
        let payload = "base64::e3sgbm9wZSgpIH19";
        let file = process_template_file("public/logo.png", payload, &options)
            .unwrap()
            .unwrap();
        assert_eq!(file.content, payload);
    }
}
