//! Project configuration model
//!
//! This module provides:
//! - Closed enumerations for every single- and multi-valued choice
//! - The `Configuration` record assembled by the front end
//! - Persisted snapshots of a configuration (see [`snapshot`])
//!
//! A disabled choice is never spelled as a `none` value: multi-selects are
//! sets that may be empty, single selects are `Option`s. The legacy `none`
//! token is still accepted on input, both through [`parse_selection`] and when
//! a snapshot is read back.

pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use snapshot::{ConfigSnapshot, SnapshotError, SNAPSHOT_FORMAT_VERSION};

/// Token accepted on input to mean "feature disabled"
pub const NONE_TOKEN: &str = "none";

/// Error returned when a selection token does not match any known value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
pub struct ParseSelectionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! selection_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $variant:ident => $token:literal $(| $alias:literal)*, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in prompt order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire token used in flags and snapshots
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }

            pub fn display_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn matches_token(&self, token: &str) -> bool {
                match self {
                    $($name::$variant => {
                        token.eq_ignore_ascii_case($token)
                            $(|| token.eq_ignore_ascii_case($alias))*
                    })+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseSelectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.matches_token(token))
                    .ok_or_else(|| ParseSelectionError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|value| value.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

selection_enum! {
    /// How users open the extension UI
    UiMode, "UI mode" {
        Popup => "popup", "Popup (opens when clicking the extension icon)",
        Window => "window", "Window (opens in a new browser tab)",
        SideWindow => "side-window" | "sidewindow", "Side window (detached pop-out)",
    }
}

selection_enum! {
    /// Sign-in methods offered to users
    AuthMethod, "authentication method" {
        Email => "email", "Email/Password",
        Google => "oauth-google" | "google", "Google OAuth",
        Github => "oauth-github" | "github", "GitHub OAuth",
    }
}

selection_enum! {
    AiProvider, "AI provider" {
        OpenAi => "openai", "OpenAI",
        Claude => "claude", "Claude",
        Gemini => "gemini", "Gemini",
    }
}

selection_enum! {
    HostingProvider, "hosting provider" {
        Vercel => "vercel", "Vercel",
        Netlify => "netlify", "Netlify",
        Firebase => "firebase", "Firebase Hosting",
        Cloudflare => "cloudflare", "Cloudflare",
        Aws => "aws", "AWS",
    }
}

selection_enum! {
    /// Cloud persistence backend
    Backend, "database" {
        Postgres => "postgres", "Postgres",
        Mongo => "mongo" | "mongodb", "MongoDB",
        Firebase => "firebase", "Firebase",
        Supabase => "supabase", "Supabase",
    }
}

impl Backend {
    /// Backend recommended when auth or monetization needs one and none was chosen
    pub const MANAGED: Backend = Backend::Firebase;
}

selection_enum! {
    Monetization, "pricing model" {
        Freemium => "freemium", "Freemium (free + paid upgrades)",
        Subscription => "subscription", "Subscription (recurring payments)",
        OneTime => "one-time" | "onetime", "One-time purchase",
        UsageBased => "usage-based", "Usage-based billing",
    }
}

selection_enum! {
    /// Browser storage area for user data
    StorageScope, "storage type" {
        Synced => "synced" | "sync", "Sync (shared across devices)",
        Local => "local", "Local (this device only)",
    }
}

impl Default for StorageScope {
    fn default() -> Self {
        StorageScope::Synced
    }
}

selection_enum! {
    WebsiteFramework, "website framework" {
        NextJs => "nextjs" | "next", "Next.js (SEO-oriented)",
        Vite => "vite", "Vite (lightweight landing page)",
    }
}

selection_enum! {
    /// Optional companion-site content blocks
    WebsiteContent, "website content" {
        CookieBanner => "cookie-banner", "Cookie consent banner",
        Newsletter => "newsletter", "Newsletter signup",
        Blog => "blog", "Blog",
        Search => "search", "Site search",
        Pwa => "pwa", "Installable app (PWA)",
        StatusPage => "status-page", "Status page",
        ApiDocs => "api-docs", "API documentation",
        UserDashboard => "user-dashboard", "User dashboard",
    }
}

/// Parse a single-valued selection, mapping the `none` token to `None`
pub fn parse_selection<T>(token: &str) -> Result<Option<T>, ParseSelectionError>
where
    T: FromStr<Err = ParseSelectionError>,
{
    if token.trim().eq_ignore_ascii_case(NONE_TOKEN) {
        Ok(None)
    } else {
        token.parse().map(Some)
    }
}

/// Parse a multi-select from tokens; `none` entries are ignored
pub fn parse_selections<T, I, S>(tokens: I) -> Result<BTreeSet<T>, ParseSelectionError>
where
    T: FromStr<Err = ParseSelectionError> + Ord,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected = BTreeSet::new();
    for token in tokens {
        if let Some(value) = parse_selection(token.as_ref())? {
            selected.insert(value);
        }
    }
    Ok(selected)
}

/// Deserializers that read selections with the same vocabulary as the flags
mod lenient {
    use super::{parse_selection, parse_selections, ParseSelectionError};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeSet;
    use std::str::FromStr;

    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr<Err = ParseSelectionError>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(token) => parse_selection(&token).map_err(D::Error::custom),
            None => Ok(None),
        }
    }

    pub fn set<'de, D, T>(deserializer: D) -> Result<BTreeSet<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr<Err = ParseSelectionError> + Ord,
    {
        let tokens = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        parse_selections(tokens).map_err(D::Error::custom)
    }
}

/// Companion website content
///
/// `pricing`, `auth` and `testimonials` are tri-state: `None` means the user
/// never answered, which is the only state the smart defaults may fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteFeatures {
    #[serde(deserialize_with = "lenient::option")]
    pub framework: Option<WebsiteFramework>,
    pub pricing: Option<bool>,
    pub auth: Option<bool>,
    pub testimonials: Option<bool>,
    pub cookie_banner: bool,
    pub newsletter: bool,
    pub blog: bool,
    pub search: bool,
    pub pwa: bool,
    pub status_page: bool,
    pub api_docs: bool,
    pub user_dashboard: bool,
}

impl WebsiteFeatures {
    pub fn wants_pricing(&self) -> bool {
        self.pricing == Some(true)
    }

    pub fn wants_auth(&self) -> bool {
        self.auth == Some(true)
    }

    pub fn wants_testimonials(&self) -> bool {
        self.testimonials == Some(true)
    }

    pub fn has_content(&self, content: WebsiteContent) -> bool {
        match content {
            WebsiteContent::CookieBanner => self.cookie_banner,
            WebsiteContent::Newsletter => self.newsletter,
            WebsiteContent::Blog => self.blog,
            WebsiteContent::Search => self.search,
            WebsiteContent::Pwa => self.pwa,
            WebsiteContent::StatusPage => self.status_page,
            WebsiteContent::ApiDocs => self.api_docs,
            WebsiteContent::UserDashboard => self.user_dashboard,
        }
    }

    pub fn set_content(&mut self, content: WebsiteContent, enabled: bool) {
        let flag = match content {
            WebsiteContent::CookieBanner => &mut self.cookie_banner,
            WebsiteContent::Newsletter => &mut self.newsletter,
            WebsiteContent::Blog => &mut self.blog,
            WebsiteContent::Search => &mut self.search,
            WebsiteContent::Pwa => &mut self.pwa,
            WebsiteContent::StatusPage => &mut self.status_page,
            WebsiteContent::ApiDocs => &mut self.api_docs,
            WebsiteContent::UserDashboard => &mut self.user_dashboard,
        };
        *flag = enabled;
    }

    /// Content that benefits from server rendering and indexing
    pub fn has_content_pages(&self) -> bool {
        self.blog || self.search || self.api_docs || self.user_dashboard
    }
}

/// The complete set of project choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "lenient::option")]
    pub ui_mode: Option<UiMode>,

    pub style_framework: bool,
    pub localization: bool,
    pub options_page: bool,
    pub accessibility: bool,

    #[serde(deserialize_with = "lenient::set")]
    pub auth_methods: BTreeSet<AuthMethod>,
    #[serde(deserialize_with = "lenient::set")]
    pub ai_providers: BTreeSet<AiProvider>,
    #[serde(deserialize_with = "lenient::set")]
    pub hosting: BTreeSet<HostingProvider>,

    #[serde(deserialize_with = "lenient::option")]
    pub backend: Option<Backend>,
    #[serde(deserialize_with = "lenient::option")]
    pub monetization: Option<Monetization>,
    pub storage: StorageScope,

    pub include_website: bool,
    pub website: WebsiteFeatures,
}

impl Configuration {
    pub fn has_auth(&self) -> bool {
        !self.auth_methods.is_empty()
    }

    pub fn has_ai(&self) -> bool {
        !self.ai_providers.is_empty()
    }

    pub fn is_monetized(&self) -> bool {
        self.monetization.is_some()
    }

    /// True when a selected feature cannot work without a backend
    pub fn needs_backend(&self) -> bool {
        self.has_auth() || self.is_monetized()
    }

    /// Lowercase, dash-separated form of the project name
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for ch in self.name.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }

    /// Placeholder values exposed to template sets
    pub fn template_variables(&self) -> HashMap<String, String> {
        fn join<T: fmt::Display>(values: &BTreeSet<T>) -> String {
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }

        let mut vars = HashMap::new();
        vars.insert("name".to_string(), self.name.trim().to_string());
        vars.insert("description".to_string(), self.description.trim().to_string());
        vars.insert("slug".to_string(), self.slug());
        vars.insert(
            "ui_mode".to_string(),
            self.ui_mode.map(|m| m.to_string()).unwrap_or_default(),
        );
        vars.insert(
            "backend".to_string(),
            self.backend.map(|b| b.to_string()).unwrap_or_default(),
        );
        vars.insert(
            "monetization".to_string(),
            self.monetization.map(|m| m.to_string()).unwrap_or_default(),
        );
        vars.insert("storage".to_string(), self.storage.to_string());
        vars.insert("auth_methods".to_string(), join(&self.auth_methods));
        vars.insert("ai_providers".to_string(), join(&self.ai_providers));
        vars.insert("hosting".to_string(), join(&self.hosting));
        vars.insert(
            "website_framework".to_string(),
            self.website
                .framework
                .filter(|_| self.include_website)
                .map(|f| f.to_string())
                .unwrap_or_default(),
        );
        vars
    }
}
