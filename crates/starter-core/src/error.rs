//! Errors raised by the compilation engine

use thiserror::Error;

/// Result type alias for compile operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Fatal compile failures.
///
/// A skipped file is not an error; `process_template_file` returns `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Failed to render {path}{owner}: {message}", owner = owner_suffix(.integration_id))]
    Render {
        path: String,
        integration_id: Option<String>,
        message: String,
    },

    #[error("Invalid template syntax in {path}: {message}")]
    Template { path: String, message: String },
}

impl CompileError {
    /// Virtual file path the failure originated from
    pub fn path(&self) -> &str {
        match self {
            CompileError::Render { path, .. } | CompileError::Template { path, .. } => path,
        }
    }

    /// Attach the owning integration to an error raised while rendering one of its files
    pub fn with_integration(self, id: &str) -> Self {
        match self {
            CompileError::Render { path, message, .. } => CompileError::Render {
                path,
                integration_id: Some(id.to_string()),
                message,
            },
            other => other,
        }
    }
}

fn owner_suffix(integration_id: &Option<String>) -> String {
    match integration_id {
        Some(id) => format!(" (integration '{}')", id),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_names_path_and_integration() {
        let err = CompileError::Render {
            path: "src/app.tsx.jinja".to_string(),
            integration_id: None,
            message: "unknown function".to_string(),
        }
        .with_integration("query");

        let text = err.to_string();
        assert!(text.contains("src/app.tsx.jinja"));
        assert!(text.contains("integration 'query'"));
        assert_eq!(err.path(), "src/app.tsx.jinja");
    }
}
