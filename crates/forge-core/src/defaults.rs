//! Smart defaults inferred from the features a user already picked

use crate::config::{Backend, Configuration, WebsiteFramework};
use serde::Serialize;

/// What the engine would fill in for fields the user left unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SmartDefaults {
    pub backend: Option<Backend>,
    pub include_pricing: bool,
    pub include_auth: bool,
    pub include_testimonials: bool,
    pub website_framework: WebsiteFramework,
}

impl Default for SmartDefaults {
    fn default() -> Self {
        Self {
            backend: None,
            include_pricing: false,
            include_auth: false,
            include_testimonials: false,
            website_framework: WebsiteFramework::NextJs,
        }
    }
}

/// Derive recommendations from a (possibly partial) configuration
///
/// Rules only ever raise a recommendation set by an earlier rule.
pub fn infer_defaults(config: &Configuration) -> SmartDefaults {
    let mut defaults = SmartDefaults::default();

    if config.has_auth() {
        defaults.backend = Some(Backend::MANAGED);
        defaults.include_auth = true;
    }

    if config.is_monetized() {
        defaults.backend = Some(Backend::MANAGED);
        defaults.include_pricing = true;
    }

    if config.include_website {
        if config.is_monetized() {
            defaults.include_pricing = true;
        }
        if config.has_auth() {
            defaults.include_auth = true;
        }

        let site = &config.website;
        if site.has_content_pages() {
            defaults.website_framework = WebsiteFramework::NextJs;
        } else if !site.wants_pricing() && !site.wants_auth() && !site.wants_testimonials() {
            // Plain landing page
            defaults.website_framework = WebsiteFramework::Vite;
        }
    }

    defaults
}

/// Fill every unset field covered by [`SmartDefaults`], keeping explicit choices
pub fn apply_defaults(config: Configuration) -> Configuration {
    let defaults = infer_defaults(&config);
    let mut merged = config;

    if merged.backend.is_none() {
        merged.backend = defaults.backend;
    }
    if merged.website.pricing.is_none() {
        merged.website.pricing = Some(defaults.include_pricing);
    }
    if merged.website.auth.is_none() {
        merged.website.auth = Some(defaults.include_auth);
    }
    if merged.website.testimonials.is_none() {
        merged.website.testimonials = Some(defaults.include_testimonials);
    }
    if merged.website.framework.is_none() {
        merged.website.framework = Some(defaults.website_framework);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMethod, Monetization, WebsiteContent, WebsiteFeatures};
    use crate::validation::validate_config;
    use proptest::prelude::*;

    #[test]
    fn test_empty_config_gets_baseline() {
        assert_eq!(infer_defaults(&Configuration::default()), SmartDefaults::default());
    }

    #[test]
    fn test_auth_recommends_managed_backend() {
        let config = Configuration {
            auth_methods: [AuthMethod::Github].into_iter().collect(),
            ..Default::default()
        };
        let defaults = infer_defaults(&config);
        assert_eq!(defaults.backend, Some(Backend::Firebase));
        assert!(defaults.include_auth);
        assert!(!defaults.include_pricing);
    }

    #[test]
    fn test_monetization_recommends_pricing() {
        let config = Configuration {
            monetization: Some(Monetization::Freemium),
            include_website: true,
            ..Default::default()
        };
        let defaults = infer_defaults(&config);
        assert_eq!(defaults.backend, Some(Backend::MANAGED));
        assert!(defaults.include_pricing);
    }

    #[test]
    fn test_framework_follows_website_content() {
        let landing = Configuration {
            include_website: true,
            ..Default::default()
        };
        assert_eq!(infer_defaults(&landing).website_framework, WebsiteFramework::Vite);

        let blog = Configuration {
            include_website: true,
            website: WebsiteFeatures {
                blog: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(infer_defaults(&blog).website_framework, WebsiteFramework::NextJs);

        let with_pricing = Configuration {
            include_website: true,
            website: WebsiteFeatures {
                pricing: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            infer_defaults(&with_pricing).website_framework,
            WebsiteFramework::NextJs
        );
    }

    #[test]
    fn test_every_content_page_selects_nextjs() {
        for content in [
            WebsiteContent::Blog,
            WebsiteContent::Search,
            WebsiteContent::ApiDocs,
            WebsiteContent::UserDashboard,
        ] {
            let mut config = Configuration {
                include_website: true,
                ..Default::default()
            };
            config.website.set_content(content, true);
            assert_eq!(
                infer_defaults(&config).website_framework,
                WebsiteFramework::NextJs,
                "{content} should select Next.js"
            );
        }
    }

    #[test]
    fn test_testimonials_alone_keep_nextjs() {
        let config = Configuration {
            include_website: true,
            website: WebsiteFeatures {
                testimonials: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(infer_defaults(&config).website_framework, WebsiteFramework::NextJs);

        let declined = Configuration {
            website: WebsiteFeatures {
                testimonials: Some(false),
                ..Default::default()
            },
            ..config
        };
        assert_eq!(infer_defaults(&declined).website_framework, WebsiteFramework::Vite);
    }

    #[test]
    fn test_framework_baseline_without_website() {
        let config = Configuration {
            include_website: false,
            ..Default::default()
        };
        assert_eq!(infer_defaults(&config).website_framework, WebsiteFramework::NextJs);
    }

    #[test]
    fn test_apply_fills_backend_and_fixes_validation() {
        let config = Configuration {
            name: "Notes".to_string(),
            description: "Synced notes".to_string(),
            ui_mode: Some(crate::config::UiMode::Popup),
            auth_methods: [AuthMethod::Email].into_iter().collect(),
            monetization: Some(Monetization::Subscription),
            ..Default::default()
        };
        assert!(!validate_config(&config).is_valid());

        let applied = apply_defaults(config);
        assert_eq!(applied.backend, Some(Backend::Firebase));
        assert_eq!(applied.website.pricing, Some(true));
        assert_eq!(applied.website.auth, Some(true));
        assert!(validate_config(&applied).is_valid());
    }

    #[test]
    fn test_apply_keeps_deliberate_false_and_explicit_backend() {
        let config = Configuration {
            auth_methods: [AuthMethod::Google].into_iter().collect(),
            backend: Some(Backend::Postgres),
            include_website: true,
            website: WebsiteFeatures {
                auth: Some(false),
                framework: Some(WebsiteFramework::Vite),
                ..Default::default()
            },
            ..Default::default()
        };

        let applied = apply_defaults(config);
        assert_eq!(applied.backend, Some(Backend::Postgres));
        assert_eq!(applied.website.auth, Some(false));
        assert_eq!(applied.website.framework, Some(WebsiteFramework::Vite));
        assert_eq!(applied.website.testimonials, Some(false));
    }

    fn arb_config() -> impl Strategy<Value = Configuration> {
        let choices = (
            prop::sample::subsequence(AuthMethod::ALL.to_vec(), 0..=AuthMethod::ALL.len()),
            prop::option::of(prop::sample::select(Backend::ALL.to_vec())),
            prop::option::of(prop::sample::select(Monetization::ALL.to_vec())),
            any::<bool>(),
            prop::option::of(any::<bool>()),
            prop::option::of(any::<bool>()),
            prop::option::of(any::<bool>()),
            prop::option::of(prop::sample::select(WebsiteFramework::ALL.to_vec())),
            any::<bool>(),
        );
        choices.prop_map(
            |(auth, backend, model, website, pricing, site_auth, quotes, framework, blog)| {
                Configuration {
                    auth_methods: auth.into_iter().collect(),
                    backend,
                    monetization: model,
                    include_website: website,
                    website: WebsiteFeatures {
                        framework,
                        pricing,
                        auth: site_auth,
                        testimonials: quotes,
                        blog,
                        ..Default::default()
                    },
                    ..Default::default()
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_apply_never_overrides_explicit_fields(config in arb_config()) {
            let applied = apply_defaults(config.clone());

            if config.backend.is_some() {
                prop_assert_eq!(applied.backend, config.backend);
            }
            if config.website.pricing.is_some() {
                prop_assert_eq!(applied.website.pricing, config.website.pricing);
            }
            if config.website.auth.is_some() {
                prop_assert_eq!(applied.website.auth, config.website.auth);
            }
            if config.website.testimonials.is_some() {
                prop_assert_eq!(applied.website.testimonials, config.website.testimonials);
            }
            if config.website.framework.is_some() {
                prop_assert_eq!(applied.website.framework, config.website.framework);
            }
            prop_assert_eq!(&applied.auth_methods, &config.auth_methods);
            prop_assert_eq!(applied.monetization, config.monetization);
        }

        #[test]
        fn prop_apply_is_idempotent(config in arb_config()) {
            let once = apply_defaults(config);
            let twice = apply_defaults(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
