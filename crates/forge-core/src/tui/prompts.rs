//! Charm-style CLI prompts using cliclack

use crate::brief;
use crate::config::{
    AiProvider, AuthMethod, Backend, ConfigSnapshot, Configuration, HostingProvider,
    Monetization, StorageScope, UiMode, WebsiteContent, WebsiteFeatures, WebsiteFramework,
};
use crate::defaults::{apply_defaults, infer_defaults};
use crate::product::ProductConfig;
use crate::templates::{ScaffoldOptions, Scaffolder};
use crate::validation::{validate_config, ValidationResult};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Wizard inputs; every `Some` field skips the matching prompt
#[derive(Debug, Clone, Default)]
pub struct WizardArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ui_mode: Option<UiMode>,

    pub style_framework: Option<bool>,
    pub localization: Option<bool>,
    pub options_page: Option<bool>,
    pub accessibility: Option<bool>,

    pub auth_methods: Option<BTreeSet<AuthMethod>>,
    pub ai_providers: Option<BTreeSet<AiProvider>>,
    pub hosting: Option<BTreeSet<HostingProvider>>,

    /// `Some(None)` means "explicitly no database"
    pub backend: Option<Option<Backend>>,
    pub monetization: Option<Option<Monetization>>,
    pub storage: Option<StorageScope>,

    pub include_website: Option<bool>,
    pub website_framework: Option<WebsiteFramework>,
    pub website_pricing: Option<bool>,
    pub website_testimonials: Option<bool>,
    pub website_auth: Option<bool>,
    pub website_content: Option<BTreeSet<WebsiteContent>>,

    /// Template sets to scaffold once the configuration is final
    pub features: Vec<String>,

    /// Project directory
    pub directory: Option<PathBuf>,

    /// Report what would happen without writing anything
    pub dry_run: bool,

    /// Accept the default answer for every prompt (non-interactive mode)
    pub yes: bool,
}

/// Run the wizard with interactive prompts
pub fn run<C: ProductConfig>(product: &C, args: WizardArgs) -> Result<()> {
    cliclack::intro(product.display_name())?;
    if args.dry_run {
        cliclack::log::info("Dry run: nothing will be written to disk")?;
    }

    // Step 1: Select directory
    let project_dir = select_directory(&args)?;

    // Step 2: Collect choices
    let config = collect_configuration(&args)?;

    // Step 3: Validate
    let result = validate_config(&config);
    show_validation(&result)?;
    if !result.is_valid() {
        cliclack::outro_cancel("Fix the errors above and run again.")?;
        anyhow::bail!("Configuration is invalid.");
    }

    // Step 4: Fill unset fields
    let config = upgrade_with_defaults(config)?;
    cliclack::note(
        "Configuration",
        brief::feature_summary(&config).join("\n"),
    )?;

    // Step 5: Persist snapshot and brief
    save_outputs(product, &project_dir, &config, args.dry_run)?;

    // Step 6: Scaffold requested template sets
    scaffold_features(product, &project_dir, &config, &args)?;

    // Step 7: Show next steps
    print_next_steps(product, &project_dir, &config)?;

    Ok(())
}

fn select_directory(args: &WizardArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.directory {
        Some(dir) => {
            let p = if dir.is_absolute() {
                dir.clone()
            } else {
                current_dir.join(dir)
            };
            cliclack::log::info(format!("Using directory: {}", p.display()))?;
            p
        }
        None if args.yes => current_dir,
        None => {
            let input: String = cliclack::input("Project directory")
                .placeholder(".")
                .default_input(".")
                .interact()?;

            if input.is_empty() || input == "." {
                current_dir
            } else {
                let p = PathBuf::from(&input);
                if p.is_absolute() {
                    p
                } else {
                    current_dir.join(p)
                }
            }
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    Ok(path)
}

fn text_or(flag: &Option<String>, yes: bool, prompt: &str, placeholder: &str) -> Result<String> {
    match flag {
        Some(value) => Ok(value.clone()),
        // Left empty for validation to report
        None if yes => Ok(String::new()),
        None => Ok(cliclack::input(prompt)
            .placeholder(placeholder)
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("This field is required")
                } else {
                    Ok(())
                }
            })
            .interact::<String>()?),
    }
}

fn confirm_or(flag: Option<bool>, yes: bool, prompt: &str, initial: bool) -> Result<bool> {
    match flag {
        Some(value) => Ok(value),
        None if yes => Ok(initial),
        None => Ok(cliclack::confirm(prompt).initial_value(initial).interact()?),
    }
}

fn select_one<T>(
    flag: Option<T>,
    yes: bool,
    prompt: &str,
    choices: &[T],
    label: fn(&T) -> &'static str,
    initial: T,
) -> Result<T>
where
    T: Copy + Eq + 'static,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    if yes {
        return Ok(initial);
    }

    let mut select = cliclack::select(prompt);
    for choice in choices {
        select = select.item(*choice, label(choice), "");
    }
    Ok(select.initial_value(initial).interact()?)
}

fn select_optional<T>(
    flag: Option<Option<T>>,
    yes: bool,
    prompt: &str,
    choices: &[T],
    label: fn(&T) -> &'static str,
    none_label: &str,
    initial: Option<T>,
) -> Result<Option<T>>
where
    T: Copy + Eq + 'static,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    if yes {
        return Ok(initial);
    }

    let mut select = cliclack::select(prompt).item(None, none_label, "");
    for choice in choices {
        select = select.item(Some(*choice), label(choice), "");
    }
    Ok(select.initial_value(initial).interact()?)
}

fn select_many<T>(
    flag: &Option<BTreeSet<T>>,
    yes: bool,
    prompt: &str,
    choices: &[T],
    label: fn(&T) -> &'static str,
) -> Result<BTreeSet<T>>
where
    T: Copy + Eq + Ord + 'static,
{
    if let Some(values) = flag {
        return Ok(values.clone());
    }
    if yes {
        return Ok(BTreeSet::new());
    }

    let mut multi = cliclack::multiselect(prompt);
    for choice in choices {
        multi = multi.item(*choice, label(choice), "");
    }
    let selected: Vec<T> = multi.required(false).interact()?;
    Ok(selected.into_iter().collect())
}

/// Ask for every field not supplied by flags
///
/// Initial answers for dependent questions come from the smart defaults of
/// what has been answered so far.
fn collect_configuration(args: &WizardArgs) -> Result<Configuration> {
    let yes = args.yes;
    let mut config = Configuration {
        description: text_or(
            &args.description,
            yes,
            "What does your extension do?",
            "Brief description of its main purpose",
        )?,
        name: text_or(&args.name, yes, "Extension name", "My Extension")?,
        ..Default::default()
    };

    config.ui_mode = Some(select_one(
        args.ui_mode,
        yes,
        "How will users open your extension?",
        UiMode::ALL,
        UiMode::display_name,
        UiMode::Popup,
    )?);
    config.style_framework = confirm_or(
        args.style_framework,
        yes,
        "Use Tailwind CSS for styling?",
        true,
    )?;
    config.localization = confirm_or(
        args.localization,
        yes,
        "Support multiple languages (i18n)?",
        true,
    )?;
    config.options_page = confirm_or(
        args.options_page,
        yes,
        "Include an options page for user settings?",
        true,
    )?;

    config.auth_methods = select_many(
        &args.auth_methods,
        yes,
        "Which sign-in methods should users have? (none selected = no authentication)",
        AuthMethod::ALL,
        AuthMethod::display_name,
    )?;
    config.ai_providers = select_many(
        &args.ai_providers,
        yes,
        "Which AI providers should be integrated?",
        AiProvider::ALL,
        AiProvider::display_name,
    )?;
    config.monetization = select_optional(
        args.monetization,
        yes,
        "How will you monetize the extension?",
        Monetization::ALL,
        Monetization::display_name,
        "None (free extension)",
        None,
    )?;

    if config.needs_backend() && args.backend.is_none() && !yes {
        cliclack::log::warning(
            "Authentication and pricing need a database. A managed option is preselected.",
        )?;
    }
    config.backend = select_optional(
        args.backend,
        yes,
        "Which database should store user data?",
        Backend::ALL,
        Backend::display_name,
        "None (no cloud database)",
        infer_defaults(&config).backend,
    )?;

    config.hosting = select_many(
        &args.hosting,
        yes,
        "Where will the backend or API be hosted?",
        HostingProvider::ALL,
        HostingProvider::display_name,
    )?;
    config.storage = select_one(
        args.storage,
        yes,
        "How should user data be stored in the browser?",
        StorageScope::ALL,
        StorageScope::display_name,
        StorageScope::default(),
    )?;
    config.accessibility = confirm_or(
        args.accessibility,
        yes,
        "Include accessibility features?",
        true,
    )?;

    config.include_website = confirm_or(
        args.include_website,
        yes,
        "Include a standalone website to promote the extension?",
        false,
    )?;
    config.website = collect_website(args, &config)?;

    Ok(config)
}

fn collect_website(args: &WizardArgs, config: &Configuration) -> Result<WebsiteFeatures> {
    let mut site = WebsiteFeatures {
        framework: args.website_framework,
        pricing: args.website_pricing,
        auth: args.website_auth,
        testimonials: args.website_testimonials,
        ..Default::default()
    };
    if let Some(content) = &args.website_content {
        for item in content {
            site.set_content(*item, true);
        }
    }

    // Unanswered website questions stay unset for the smart defaults
    if !config.include_website || args.yes {
        return Ok(site);
    }

    let recommended = infer_defaults(config);
    if site.pricing.is_none() {
        site.pricing = Some(
            cliclack::confirm("Show pricing information on the website?")
                .initial_value(recommended.include_pricing)
                .interact()?,
        );
    }
    if site.testimonials.is_none() {
        site.testimonials = Some(
            cliclack::confirm("Include a testimonials section?")
                .initial_value(true)
                .interact()?,
        );
    }
    if site.auth.is_none() {
        site.auth = Some(
            cliclack::confirm("Include sign-in on the website?")
                .initial_value(recommended.include_auth)
                .interact()?,
        );
    }
    if args.website_content.is_none() {
        let mut multi = cliclack::multiselect("Additional website content");
        for content in WebsiteContent::ALL {
            multi = multi.item(*content, content.display_name(), "");
        }
        let selected: Vec<WebsiteContent> = multi.required(false).interact()?;
        for content in selected {
            site.set_content(content, true);
        }
    }
    if site.framework.is_none() {
        let partial = Configuration {
            website: site.clone(),
            ..config.clone()
        };
        let mut select = cliclack::select("Website framework");
        for framework in WebsiteFramework::ALL {
            select = select.item(*framework, framework.display_name(), "");
        }
        site.framework = Some(
            select
                .initial_value(infer_defaults(&partial).website_framework)
                .interact()?,
        );
    }

    Ok(site)
}

fn show_validation(result: &ValidationResult) -> Result<()> {
    for warning in result.warnings() {
        cliclack::log::warning(warning)?;
    }
    for error in result.errors() {
        cliclack::log::error(error)?;
    }
    Ok(())
}

fn upgrade_with_defaults(config: Configuration) -> Result<Configuration> {
    let before = config.clone();
    let after = apply_defaults(config);

    if before.backend != after.backend {
        if let Some(backend) = after.backend {
            cliclack::log::info(format!("Smart default: database set to {}", backend))?;
        }
    }
    if before.include_website && before.website.framework.is_none() {
        if let Some(framework) = after.website.framework {
            cliclack::log::info(format!(
                "Smart default: website framework set to {}",
                framework.display_name()
            ))?;
        }
    }

    Ok(after)
}

fn save_outputs<C: ProductConfig>(
    product: &C,
    project_dir: &Path,
    config: &Configuration,
    dry_run: bool,
) -> Result<()> {
    let snapshot_path = project_dir.join(product.snapshot_file());
    ConfigSnapshot::new(config.clone())
        .save(&snapshot_path, dry_run)
        .context("Failed to save configuration snapshot")?;

    let brief_text = brief::generate_brief(config);
    let brief_path = brief::save_brief(project_dir, &brief_text, dry_run)
        .context("Failed to write build brief")?;

    if dry_run {
        cliclack::log::info(format!(
            "[DRY RUN] Would write {} and {}",
            snapshot_path.display(),
            brief_path.display()
        ))?;
    } else {
        cliclack::log::success(format!("Saved {}", snapshot_path.display()))?;
        cliclack::log::success(format!("Build brief written to {}", brief_path.display()))?;
    }
    Ok(())
}

fn scaffold_features<C: ProductConfig>(
    product: &C,
    project_dir: &Path,
    config: &Configuration,
    args: &WizardArgs,
) -> Result<()> {
    if args.features.is_empty() {
        return Ok(());
    }

    let scaffolder = Scaffolder::from_config(product);
    let variables = config.template_variables();

    for feature in &args.features {
        let spinner = cliclack::spinner();
        spinner.start(format!("Scaffolding {}...", feature));

        let options = ScaffoldOptions::new(feature.clone(), variables.clone())
            .target_dir(project_dir)
            .report_file(project_dir.join(product.report_file()))
            .dry_run(args.dry_run);
        let report = match scaffolder.scaffold(&options) {
            Ok(report) => report,
            Err(e) => {
                spinner.error(format!("Failed to scaffold {}", feature));
                return Err(e).with_context(|| format!("Scaffolding '{}' failed", feature));
            }
        };

        if args.dry_run {
            spinner.stop(format!("[DRY RUN] {} ({} files)", feature, report.entries.len()));
            cliclack::note("Scaffold report", report.to_string())?;
        } else {
            spinner.stop(format!(
                "Created {} files for {}",
                report.entries.len(),
                feature
            ));
        }
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    product: &C,
    project_dir: &Path,
    config: &Configuration,
) -> Result<()> {
    let steps = product.next_steps(project_dir, config);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy building!")?;

    Ok(())
}
