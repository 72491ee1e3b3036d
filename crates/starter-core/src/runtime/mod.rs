//! Runtime detection
//!
//! Advisory checks for the tools a generated project needs.

pub mod check;

pub use check::{check_node, check_package_manager, check_runtimes, RuntimeInfo};
