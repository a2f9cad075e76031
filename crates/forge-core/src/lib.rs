//! Forge Core - configuration, validation and scaffolding for browser extension projects
//!
//! This library holds everything a project wizard needs besides the questions
//! themselves. Front ends build a [`Configuration`], and the core hands back
//! plain data.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Configuration model, validation rules, smart
//!   defaults, template rendering and scaffolding
//! - **Layer 2: Product Integration** - `ProductConfig` trait, configuration
//!   snapshots and the build brief
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based wizard (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based wizard module
//!
//! # Example Usage (without TUI)
//!
//! ```no_run
//! use forge_core::{apply_defaults, validate_config, Configuration, ScaffoldOptions, Scaffolder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Configuration {
//!     name: "Tab Tamer".to_string(),
//!     description: "Groups idle tabs".to_string(),
//!     ui_mode: Some(forge_core::config::UiMode::Popup),
//!     ..Default::default()
//! };
//!
//! let result = validate_config(&config);
//! if result.is_valid() {
//!     let config = apply_defaults(config);
//!     let options = ScaffoldOptions::new("popup", config.template_variables()).dry_run(true);
//!     let report = Scaffolder::new("scaffold-templates").scaffold(&options)?;
//!     println!("{}", report);
//! }
//! # Ok(())
//! # }
//! ```

pub mod brief;
pub mod config;
pub mod defaults;
pub mod product;
pub mod templates;
pub mod validation;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ConfigSnapshot, Configuration, SnapshotError, WebsiteFeatures};
pub use defaults::{apply_defaults, infer_defaults, SmartDefaults};
pub use product::ProductConfig;
pub use templates::{
    render_template, ScaffoldError, ScaffoldOptions, ScaffoldReport, Scaffolder,
};
pub use validation::{validate_config, ValidationResult};

#[cfg(feature = "tui")]
pub use tui::run;
