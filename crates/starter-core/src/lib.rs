//! Starter Core - compilation engine for starter projects
//!
//! Assembles a web-application project from a fixed base plus a set of
//! composable integrations, and can report which integration produced every
//! line of every generated file.
//!
//! # Architecture
//!
//! - **Engine** - `compile`, `compile_with_attribution`, the base generators
//!   and template processing. Pure: no I/O.
//! - **Collaborators** - registry fetching, `.starter.json` persistence,
//!   writing the output tree, runtime detection.
//! - **CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use starter_core::{compile, CompileOptions, registry::IntegrationFetcher};
//!
//! let fetcher = IntegrationFetcher::from_local("integrations".into(), "my-cli");
//! let mut options = CompileOptions::new("my-app");
//! options.chosen_integrations = fetcher.resolve_integrations(&["query".into()]).await?;
//! let output = compile(&options)?;
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod generators;
pub mod model;
pub mod paths;
pub mod product;
pub mod registry;
pub mod runtime;
pub mod template;
pub mod writer;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use compile::{compile, compile_with_attribution};
pub use config::{read_config, write_config, PersistedConfig};
pub use error::{CompileError, Result};
pub use generators::{get_base_files, get_base_files_with_attribution};
pub use model::{
    AttributedCompileOutput, AttributedFile, CompileOptions, CompileOutput, CustomTemplate,
    EnvVar, Framework, Hook, HookType, Integration, IntegrationType, LineAttribution,
    PackageAdditions, PackageManager, Phase, Route, RouterMode,
};
pub use paths::relative_path;
pub use product::ProductConfig;
pub use registry::{IntegrationFetcher, IntegrationSource};
pub use template::process_template_file;
pub use writer::write_project;

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for integration compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
