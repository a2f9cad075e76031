//! Build brief: a Markdown summary of the chosen features, meant to be handed
//! to whoever (or whatever) writes the extension code.

use crate::config::{Configuration, UiMode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Brief location, relative to the project directory
pub const BRIEF_FILE: &str = "docs/ai-project-prompt.md";

fn joined<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Feature lines, one per selected feature
pub fn feature_summary(config: &Configuration) -> Vec<String> {
    let mut features = Vec::new();

    match config.ui_mode {
        Some(UiMode::SideWindow) => {
            features.push(
                "- Side Window (detached pop-out): opens in a dedicated window, not injected \
                 into the page"
                    .to_string(),
            );
            features.push(
                "  - The toolbar action only launches the window; it is not the full UI"
                    .to_string(),
            );
        }
        Some(mode) => features.push(format!("- UI Type: {}", mode)),
        None => {}
    }

    if config.style_framework {
        features.push("- Tailwind CSS: Yes".to_string());
    }
    if config.localization {
        features.push("- i18n: Yes".to_string());
    }
    if config.options_page {
        features.push("- Options Page: Yes".to_string());
    }
    if config.has_auth() {
        features.push(format!("- Authentication: {}", joined(&config.auth_methods)));
    }
    if config.has_ai() {
        features.push(format!("- AI Integrations: {}", joined(&config.ai_providers)));
    }
    if let Some(backend) = config.backend {
        features.push(format!("- Database: {}", backend));
    }
    if let Some(model) = config.monetization {
        features.push(format!("- Pricing Model: {}", model));
    }
    if !config.hosting.is_empty() {
        features.push(format!("- Hosting: {}", joined(&config.hosting)));
    }
    features.push(format!("- Browser Storage: {}", config.storage));
    if config.accessibility {
        features.push("- Accessibility Features: Yes".to_string());
    }

    if config.include_website {
        let site = &config.website;
        match site.framework {
            Some(framework) => features.push(format!(
                "- Standalone Website: Yes ({})",
                framework.display_name()
            )),
            None => features.push("- Standalone Website: Yes".to_string()),
        }
        let sections = [
            (site.wants_pricing(), "pricing information"),
            (site.wants_testimonials(), "testimonials section"),
            (site.wants_auth(), "authentication features"),
            (site.cookie_banner, "cookie consent banner"),
            (site.newsletter, "newsletter signup"),
            (site.blog, "blog"),
            (site.search, "search"),
            (site.pwa, "installable app support"),
            (site.status_page, "status page"),
            (site.api_docs, "API documentation"),
            (site.user_dashboard, "user dashboard"),
        ];
        for (enabled, label) in sections {
            if enabled {
                features.push(format!("  - Website includes {}", label));
            }
        }
    }

    features
}

/// Render the full brief for a configuration
pub fn generate_brief(config: &Configuration) -> String {
    let mut lines = vec![
        format!("# {} - Build Brief", config.name.trim()),
        String::new(),
        config.description.trim().to_string(),
        String::new(),
        "## Features".to_string(),
        String::new(),
    ];
    lines.extend(feature_summary(config));

    if config.has_auth() {
        lines.extend(section(
            "Authentication",
            &[
                "Sign-up, login, password reset and account settings flows",
                "Session tokens kept in extension storage and refreshed in the background script",
                "Rate-limited login attempts and server-side input validation",
            ],
        ));
    }

    lines.extend(section(
        "Documentation",
        &[
            "docs/prd.md - product requirements, items ticked off as they ship",
            "docs/design-system.md - colour tokens, typography and base components",
            "docs/recipes.md - messaging, permissions and storage patterns",
            "docs/store-listing.md - web store submission checklist",
        ],
    ));

    let mut brief = lines.join("\n");
    brief.push('\n');
    brief
}

/// Blank line, `## title`, blank line, then one bullet per item
fn section(title: &str, items: &[&str]) -> Vec<String> {
    let mut lines = vec![String::new(), format!("## {}", title), String::new()];
    lines.extend(items.iter().map(|item| format!("- {}", item)));
    lines
}

/// Write the brief under `project_dir`; returns the path (not written in dry-run mode)
pub fn save_brief(project_dir: &Path, brief: &str, dry_run: bool) -> io::Result<PathBuf> {
    let path = project_dir.join(BRIEF_FILE);
    if dry_run {
        return Ok(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, brief)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMethod, Backend, WebsiteFeatures, WebsiteFramework};

    fn config() -> Configuration {
        Configuration {
            name: "Tab Tamer".to_string(),
            description: "Groups and sleeps idle tabs".to_string(),
            ui_mode: Some(UiMode::Popup),
            style_framework: true,
            auth_methods: [AuthMethod::Email].into_iter().collect(),
            backend: Some(Backend::Supabase),
            ..Default::default()
        }
    }

    #[test]
    fn test_feature_summary_lists_selected_features() {
        let lines = feature_summary(&config());
        assert_eq!(lines[0], "- UI Type: popup");
        assert!(lines.contains(&"- Tailwind CSS: Yes".to_string()));
        assert!(lines.contains(&"- Authentication: email".to_string()));
        assert!(lines.contains(&"- Database: supabase".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("- Pricing Model")));
        assert!(!lines.iter().any(|l| l.starts_with("- Standalone Website")));
    }

    #[test]
    fn test_side_window_and_website_sections() {
        let config = Configuration {
            ui_mode: Some(UiMode::SideWindow),
            include_website: true,
            website: WebsiteFeatures {
                framework: Some(WebsiteFramework::Vite),
                testimonials: Some(true),
                blog: true,
                ..Default::default()
            },
            ..config()
        };
        let lines = feature_summary(&config);
        assert!(lines[0].starts_with("- Side Window"));
        let website = "- Standalone Website: Yes (Vite (lightweight landing page))";
        assert!(lines.contains(&website.to_string()));
        assert!(lines.contains(&"  - Website includes testimonials section".to_string()));
        assert!(lines.contains(&"  - Website includes blog".to_string()));
    }

    #[test]
    fn test_brief_has_auth_section_only_with_auth() {
        assert!(generate_brief(&config()).contains("## Authentication"));

        let anonymous = Configuration {
            auth_methods: Default::default(),
            ..config()
        };
        let brief = generate_brief(&anonymous);
        let opening = "# Tab Tamer - Build Brief\n\nGroups and sleeps idle tabs\n\n## Features\n\n";
        assert!(brief.starts_with(opening));
        assert!(!brief.contains("## Authentication"));
        assert!(brief.contains("\n\n## Documentation\n\n- docs/prd.md"));
        assert!(brief.ends_with("- docs/store-listing.md - web store submission checklist\n"));
    }

    #[test]
    fn test_save_brief_respects_dry_run() {
        let dir = tempfile::tempdir().unwrap();

        let path = save_brief(dir.path(), "brief", true).unwrap();
        assert!(!path.exists());

        let path = save_brief(dir.path(), "brief", false).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "brief");
    }
}
