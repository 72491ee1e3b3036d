//! Virtual path helpers
//!
//! All paths handled here are `/`-separated virtual paths relative to the
//! project root. Nothing in this module touches the filesystem.

/// Marker a path segment uses to encode a leading dot
pub const DOT_MARKER: &str = "_dot_";

/// Suffix marking a file whose content is appended instead of replacing
pub const APPEND_SUFFIX: &str = ".append";

/// Compute the import path from `from_file` to `to_file`.
///
/// The result always starts with `.`; with `strip_extension` the final
/// `.ext` of the last segment is dropped.
pub fn relative_path(from_file: &str, to_file: &str, strip_extension: bool) -> String {
    let from_parts: Vec<&str> = from_file.split('/').collect();
    let to_parts: Vec<&str> = to_file.split('/').collect();

    let from_dirs = &from_parts[..from_parts.len() - 1];
    let to_dirs = &to_parts[..to_parts.len() - 1];

    let common = from_dirs
        .iter()
        .zip(to_dirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = vec![".."; from_dirs.len() - common];
    segments.extend_from_slice(&to_parts[common..]);

    let mut relative = segments.join("/");
    if !relative.starts_with('.') {
        relative = format!("./{}", relative);
    }

    if strip_extension {
        if let Some(idx) = relative.rfind('.') {
            if idx > 0 && !relative[idx..].contains('/') {
                relative.truncate(idx);
            }
        }
    }

    relative
}

/// Replace a leading `_dot_` on any segment with a literal `.`
pub fn convert_dot_files(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(DOT_MARKER) {
            Some(rest) => format!(".{}", rest),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Drop a `__token__` marker from the start of the file name.
///
/// `dir/__postgres__schema.prisma` becomes `dir/schema.prisma`; names like
/// `__root.tsx` carry no closing marker and are left alone.
pub fn strip_option_prefix(path: &str) -> String {
    let (dir, filename) = match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    };

    let Some(after_open) = filename.strip_prefix("__") else {
        return path.to_string();
    };

    match after_open.find("__") {
        Some(close) if close > 0 && close + 2 < after_open.len() => {
            format!("{}{}", dir, &after_open[close + 2..])
        }
        _ => path.to_string(),
    }
}

/// Strip the append marker, reporting whether it was present
pub fn strip_append_suffix(path: &str) -> (String, bool) {
    match path.strip_suffix(APPEND_SUFFIX) {
        Some(stripped) => (stripped.to_string(), true),
        None => (path.to_string(), false),
    }
}

/// Rewrite TypeScript extensions for a JavaScript project
pub fn to_javascript_extension(path: &str) -> String {
    if let Some(stem) = path.strip_suffix(".tsx") {
        format!("{}.jsx", stem)
    } else if let Some(stem) = path.strip_suffix(".ts") {
        format!("{}.js", stem)
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_same_directory() {
        assert_eq!(
            relative_path("src/routes/index.tsx", "src/routes/about.tsx", false),
            "./about.tsx"
        );
    }

    #[test]
    fn test_relative_path_walks_up() {
        assert_eq!(
            relative_path(
                "src/routes/demo/test.tsx",
                "src/integrations/query/client.ts",
                false
            ),
            "../../integrations/query/client.ts"
        );
    }

    #[test]
    fn test_relative_path_no_common_prefix() {
        assert_eq!(
            relative_path("app/pages/home.tsx", "lib/util.ts", false),
            "../../lib/util.ts"
        );
    }

    #[test]
    fn test_relative_path_from_root_file() {
        assert_eq!(
            relative_path(
                "vite.config.ts",
                "src/integrations/query/vite-plugin.ts",
                true
            ),
            "./src/integrations/query/vite-plugin"
        );
    }

    #[test]
    fn test_relative_path_strips_only_final_extension() {
        assert_eq!(
            relative_path("src/main.tsx", "src/lib/store.config.ts", true),
            "./lib/store.config"
        );
        assert_eq!(
            relative_path("src/routes/a/b.tsx", "src/lib/noext", true),
            "../../lib/noext"
        );
    }

    #[test]
    fn test_convert_dot_files() {
        assert_eq!(convert_dot_files("_dot_gitignore"), ".gitignore");
        assert_eq!(
            convert_dot_files("_dot_vscode/settings.json"),
            ".vscode/settings.json"
        );
        assert_eq!(convert_dot_files("src/main.tsx"), "src/main.tsx");
    }

    #[test]
    fn test_strip_option_prefix() {
        assert_eq!(
            strip_option_prefix("dir/__postgres__schema.prisma"),
            "dir/schema.prisma"
        );
        assert_eq!(strip_option_prefix("__mysql__db.ts"), "db.ts");
        assert_eq!(strip_option_prefix("dir/schema.prisma"), "dir/schema.prisma");
        assert_eq!(
            strip_option_prefix("src/routes/__root.tsx"),
            "src/routes/__root.tsx"
        );
    }

    #[test]
    fn test_strip_append_suffix() {
        assert_eq!(
            strip_append_suffix(".gitignore.append"),
            (".gitignore".to_string(), true)
        );
        assert_eq!(
            strip_append_suffix("src/main.tsx"),
            ("src/main.tsx".to_string(), false)
        );
    }

    #[test]
    fn test_to_javascript_extension() {
        assert_eq!(to_javascript_extension("src/a.tsx"), "src/a.jsx");
        assert_eq!(to_javascript_extension("src/a.ts"), "src/a.js");
        assert_eq!(to_javascript_extension("src/a.css"), "src/a.css");
    }
}
