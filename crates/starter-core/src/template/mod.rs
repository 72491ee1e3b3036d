//! Template rendering for contributed files
//!
//! This module provides:
//! - The per-file template context (flags, integrations, hooks, routes)
//! - Rendering through minijinja with the project helpers registered
//! - Single-file processing: render, then compute the output path

pub mod context;
pub mod file;
pub mod render;

pub use context::TemplateContext;
pub use file::{output_path, process_template_file, ProcessedFile, BINARY_PREFIX, TEMPLATE_EXTENSION};
pub use render::{render_template, Rendered};
