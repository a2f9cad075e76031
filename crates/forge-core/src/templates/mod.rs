//! Template rendering and scaffolding
//!
//! This module provides:
//! - `{{placeholder}}` substitution over plain text
//! - The scaffold engine that materializes a named template set into a
//!   project directory, with dry-run support and an append-only report

pub mod render;
pub mod scaffold;

pub use render::{placeholders, render_template};
pub use scaffold::{
    ScaffoldEntry, ScaffoldError, ScaffoldOptions, ScaffoldReport, Scaffolder,
    DEFAULT_REPORT_FILE, DEFAULT_TEMPLATE_DIR,
};
