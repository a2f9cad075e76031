//! Product configuration trait for CLI binaries
//!
//! The wizard and the scaffold engine are product-agnostic; a binary supplies
//! its identity, default locations and post-setup instructions through this
//! trait.

use crate::config::Configuration;
use std::path::Path;

/// Configuration trait for CLI products built on this crate
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Where template sets live, and the env var overriding that
/// - Where the scaffold report and configuration snapshot are written
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable name for overriding the template root
    fn template_dir_env(&self) -> &'static str;

    /// Template root used when the environment does not override it
    fn default_template_dir(&self) -> &'static str {
        crate::templates::DEFAULT_TEMPLATE_DIR
    }

    /// Scaffold report path, relative to the project directory
    fn report_file(&self) -> &'static str {
        crate::templates::DEFAULT_REPORT_FILE
    }

    /// Configuration snapshot path, relative to the project directory
    fn snapshot_file(&self) -> &'static str {
        ".forge/config.yaml"
    }

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Generate the "next steps" instructions after the wizard finishes
    fn next_steps(&self, dir: &Path, config: &Configuration) -> Vec<String>;
}
