//! Cross-feature validation of a finished configuration
//!
//! Every rule is a named predicate in [`RULES`]. Rules are independent of each
//! other; the list order only fixes the order of user-facing messages.

use crate::config::Configuration;
use serde::Serialize;
use std::fmt;

/// Whether a rule blocks generation or only advises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single cross-field check
pub trait Rule: Sync {
    /// Stable identifier, useful in tests and logs
    fn id(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// Returns the message to report, or `None` when the configuration passes
    fn check(&self, config: &Configuration) -> Option<String>;
}

pub const AUTH_REQUIRES_BACKEND: &str =
    "Authentication requires a database. Please select a database option.";
pub const PRICING_REQUIRES_BACKEND: &str =
    "Pricing model requires a database. Please select a database option.";

pub struct NameRequired;

impl Rule for NameRequired {
    fn id(&self) -> &'static str {
        "name-required"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        config
            .name
            .trim()
            .is_empty()
            .then(|| "Extension name is required".to_string())
    }
}

pub struct DescriptionRequired;

impl Rule for DescriptionRequired {
    fn id(&self) -> &'static str {
        "description-required"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        config
            .description
            .trim()
            .is_empty()
            .then(|| "Extension description is required".to_string())
    }
}

pub struct UiModeRequired;

impl Rule for UiModeRequired {
    fn id(&self) -> &'static str {
        "ui-mode-required"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        config
            .ui_mode
            .is_none()
            .then(|| "UI type is required".to_string())
    }
}

pub struct AuthRequiresBackend;

impl Rule for AuthRequiresBackend {
    fn id(&self) -> &'static str {
        "auth-requires-backend"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        (config.has_auth() && config.backend.is_none()).then(|| AUTH_REQUIRES_BACKEND.to_string())
    }
}

pub struct PricingRequiresBackend;

impl Rule for PricingRequiresBackend {
    fn id(&self) -> &'static str {
        "pricing-requires-backend"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        (config.is_monetized() && config.backend.is_none())
            .then(|| PRICING_REQUIRES_BACKEND.to_string())
    }
}

pub struct WebsitePricingWithoutModel;

impl Rule for WebsitePricingWithoutModel {
    fn id(&self) -> &'static str {
        "website-pricing-without-model"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        (config.include_website && config.website.wants_pricing() && !config.is_monetized()).then(
            || {
                "Website includes pricing information but no pricing model is selected. \
                 Consider adding a pricing model."
                    .to_string()
            },
        )
    }
}

pub struct WebsiteAuthWithoutMethod;

impl Rule for WebsiteAuthWithoutMethod {
    fn id(&self) -> &'static str {
        "website-auth-without-method"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        (config.include_website && config.website.wants_auth() && !config.has_auth()).then(|| {
            "Website includes authentication features but no authentication methods are \
             selected. Consider adding authentication methods."
                .to_string()
        })
    }
}

pub struct CookieBannerWithoutWebsite;

impl Rule for CookieBannerWithoutWebsite {
    fn id(&self) -> &'static str {
        "cookie-banner-without-website"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        (config.website.cookie_banner && !config.include_website).then(|| {
            "Cookie banner is selected but website is not included. \
             Cookie banners are typically used on websites."
                .to_string()
        })
    }
}

pub struct AiWithoutBackend;

impl Rule for AiWithoutBackend {
    fn id(&self) -> &'static str {
        "ai-without-backend"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, config: &Configuration) -> Option<String> {
        (config.has_ai() && config.backend.is_none()).then(|| {
            "AI features are selected but no database is configured. Consider adding a \
             database for conversation history and user preferences."
                .to_string()
        })
    }
}

/// All rules, in reporting order
pub static RULES: &[&dyn Rule] = &[
    &NameRequired,
    &DescriptionRequired,
    &UiModeRequired,
    &AuthRequiresBackend,
    &PricingRequiresBackend,
    &WebsitePricingWithoutModel,
    &WebsiteAuthWithoutMethod,
    &CookieBannerWithoutWebsite,
    &AiWithoutBackend,
];

/// Outcome of validating one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_messages(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return writeln!(f, "Configuration is valid.");
        }
        for error in &self.errors {
            writeln!(f, "  - error: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "  - warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Check a configuration against every rule in [`RULES`]
pub fn validate_config(config: &Configuration) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for rule in RULES {
        if let Some(message) = rule.check(config) {
            tracing::debug!(rule = rule.id(), "validation rule triggered");
            match rule.severity() {
                Severity::Error => errors.push(message),
                Severity::Warning => warnings.push(message),
            }
        }
    }

    ValidationResult::from_messages(errors, warnings)
}
