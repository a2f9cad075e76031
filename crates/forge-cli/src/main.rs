//! Extension Forge CLI - project scaffolding for browser extensions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use forge_core::config::{
    parse_selection, parse_selections, AiProvider, AuthMethod, Backend, Configuration,
    HostingProvider, Monetization, StorageScope, UiMode, WebsiteContent, WebsiteFramework,
};
use forge_core::templates::placeholders;
use forge_core::tui::WizardArgs;
use forge_core::{
    infer_defaults, validate_config, ConfigSnapshot, ProductConfig, ScaffoldOptions, Scaffolder,
    SmartDefaults, ValidationResult,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the diagnostics filter
const LOG_ENV: &str = "FORGE_LOG";

/// Extension Forge product configuration
#[derive(Clone)]
pub struct ForgeConfig;

impl ProductConfig for ForgeConfig {
    fn name(&self) -> &'static str {
        "extension-forge"
    }

    fn display_name(&self) -> &'static str {
        "Extension Forge"
    }

    fn template_dir_env(&self) -> &'static str {
        "FORGE_TEMPLATE_DIR"
    }

    fn cli_description(&self) -> &'static str {
        "Wizard for configuring and scaffolding browser extension projects"
    }

    fn next_steps(&self, dir: &Path, config: &Configuration) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Hand the brief to whoever writes the code
        steps.push(format!(
            "Review {} and use it to generate the project",
            forge_core::brief::BRIEF_FILE
        ));

        // Step 3: Backend credentials
        if let Some(backend) = config.backend {
            steps.push(format!(
                "Add your {} credentials to .env",
                backend.display_name()
            ));
        }

        // Step 4: Companion site
        if config.include_website {
            if let Some(framework) = config.website.framework {
                steps.push(format!("Set up the website with {}", framework.display_name()));
            }
        }

        // Step 5: Load in the browser
        steps.push("Load the unpacked extension from chrome://extensions".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "extension-forge")]
#[command(about = "Wizard for configuring and scaffolding browser extension projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure a new extension project (interactive unless every flag is given)
    Init(InitArgs),
    /// Render a template set into a directory
    Scaffold(ScaffoldArgs),
    /// Validate a saved configuration snapshot
    Validate(ValidateArgs),
    /// List available template sets
    Features(FeaturesArgs),
}

#[derive(Parser, Debug, Default)]
pub struct InitArgs {
    /// Extension name
    #[arg(long)]
    pub name: Option<String>,

    /// What the extension does
    #[arg(long)]
    pub description: Option<String>,

    /// UI mode: popup, window or side-window
    #[arg(long = "ui")]
    pub ui_mode: Option<UiMode>,

    /// Include Tailwind CSS
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub tailwind: Option<bool>,

    /// Include i18n support
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub i18n: Option<bool>,

    /// Include an options page
    #[arg(long = "options-page", num_args = 0..=1, default_missing_value = "true")]
    pub options_page: Option<bool>,

    /// Include accessibility features
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub accessibility: Option<bool>,

    /// Authentication methods (comma-separated: email,oauth-google,oauth-github or none)
    #[arg(long, value_delimiter = ',')]
    pub auth: Option<Vec<String>>,

    /// AI providers (comma-separated: openai,claude,gemini or none)
    #[arg(long, value_delimiter = ',')]
    pub ai: Option<Vec<String>>,

    /// Hosting providers (comma-separated: vercel,netlify,firebase,cloudflare,aws or none)
    #[arg(long, value_delimiter = ',')]
    pub hosting: Option<Vec<String>>,

    /// Database: postgres, mongo, firebase, supabase or none
    #[arg(long)]
    pub database: Option<String>,

    /// Pricing model: freemium, subscription, one-time, usage-based or none
    #[arg(long)]
    pub pricing: Option<String>,

    /// Browser storage: synced or local
    #[arg(long)]
    pub storage: Option<StorageScope>,

    /// Include a standalone website
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub website: Option<bool>,

    /// Website framework: nextjs or vite
    #[arg(long = "website-framework")]
    pub website_framework: Option<WebsiteFramework>,

    /// Show pricing on the website
    #[arg(long = "website-pricing", num_args = 0..=1, default_missing_value = "true")]
    pub website_pricing: Option<bool>,

    /// Show testimonials on the website
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub testimonials: Option<bool>,

    /// Offer sign-in on the website
    #[arg(long = "website-auth", num_args = 0..=1, default_missing_value = "true")]
    pub website_auth: Option<bool>,

    /// Extra website content (comma-separated: cookie-banner,newsletter,blog,search,pwa,status-page,api-docs,user-dashboard)
    #[arg(long = "website-content", value_delimiter = ',')]
    pub website_content: Option<Vec<String>>,

    /// Template set to scaffold after configuration (repeatable)
    #[arg(short, long = "feature")]
    pub features: Vec<String>,

    /// Project directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Preview without writing files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl TryFrom<InitArgs> for WizardArgs {
    type Error = anyhow::Error;

    fn try_from(args: InitArgs) -> Result<Self> {
        Ok(WizardArgs {
            name: args.name,
            description: args.description,
            ui_mode: args.ui_mode,
            style_framework: args.tailwind,
            localization: args.i18n,
            options_page: args.options_page,
            accessibility: args.accessibility,
            auth_methods: args
                .auth
                .map(parse_selections::<AuthMethod, _, _>)
                .transpose()?,
            ai_providers: args
                .ai
                .map(parse_selections::<AiProvider, _, _>)
                .transpose()?,
            hosting: args
                .hosting
                .map(parse_selections::<HostingProvider, _, _>)
                .transpose()?,
            backend: args
                .database
                .as_deref()
                .map(parse_selection::<Backend>)
                .transpose()?,
            monetization: args
                .pricing
                .as_deref()
                .map(parse_selection::<Monetization>)
                .transpose()?,
            storage: args.storage,
            include_website: args.website,
            website_framework: args.website_framework,
            website_pricing: args.website_pricing,
            website_testimonials: args.testimonials,
            website_auth: args.website_auth,
            website_content: args
                .website_content
                .map(parse_selections::<WebsiteContent, _, _>)
                .transpose()?,
            features: args.features,
            directory: args.dir,
            dry_run: args.dry_run,
            yes: args.yes,
        })
    }
}

#[derive(Parser, Debug)]
pub struct ScaffoldArgs {
    /// Template set name (a directory under the template root)
    pub feature: String,

    /// Placeholder value as key=value (repeatable)
    #[arg(long = "var", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Take placeholder values from a configuration snapshot
    #[arg(long = "from-snapshot")]
    pub from_snapshot: Option<PathBuf>,

    /// Directory to write into (defaults to the current directory)
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Report file to append to
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Template root to use instead of the default
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Preview without writing files
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Snapshot file (defaults to .forge/config.yaml)
    pub snapshot: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct FeaturesArgs {
    /// Template root to use instead of the default
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn scaffolder_for(config: &ForgeConfig, template_dir: &Option<PathBuf>) -> Scaffolder {
    match template_dir {
        Some(dir) => Scaffolder::new(dir.clone()),
        None => Scaffolder::from_config(config),
    }
}

fn run_scaffold(config: &ForgeConfig, args: ScaffoldArgs) -> Result<()> {
    let scaffolder = scaffolder_for(config, &args.template_dir);

    let mut variables: HashMap<String, String> = match &args.from_snapshot {
        Some(path) => ConfigSnapshot::load(path)?.config.template_variables(),
        None => HashMap::new(),
    };
    variables.extend(args.vars);

    warn_unset_placeholders(&scaffolder, &args.feature, &variables)?;

    let mut options = ScaffoldOptions::new(args.feature, variables).dry_run(args.dry_run);
    if let Some(target) = args.target {
        options = options.target_dir(target);
    }
    if let Some(report) = args.report {
        options = options.report_file(report);
    }

    let report = scaffolder.scaffold(&options)?;

    if args.dry_run {
        println!("{}", report);
        println!("{}", "No files were written.".yellow());
    } else {
        println!(
            "{} {} file(s) for {}",
            "Created".green().bold(),
            report.entries.len(),
            report.feature
        );
    }
    Ok(())
}

/// Warn about placeholders the template set uses but no variable provides
fn warn_unset_placeholders(
    scaffolder: &Scaffolder,
    feature: &str,
    variables: &HashMap<String, String>,
) -> Result<()> {
    let set_dir = scaffolder.template_set_dir(feature)?;
    for relative in scaffolder.template_files(feature)? {
        let path = set_dir.join(&relative);
        // Non-UTF-8 files are reported by the scaffold run itself
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        for name in placeholders(&content) {
            if !variables.contains_key(&name) {
                eprintln!(
                    "{} {{{{{}}}}} in {} has no value and will render empty",
                    "Warning:".yellow(),
                    name,
                    relative.display()
                );
            }
        }
    }
    Ok(())
}

fn run_validate(config: &ForgeConfig, args: ValidateArgs) -> Result<()> {
    let path = args
        .snapshot
        .unwrap_or_else(|| PathBuf::from(config.snapshot_file()));
    let snapshot = ConfigSnapshot::load(&path)?;
    if let Some(warning) = snapshot.compatibility_warning() {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    let result = validate_config(&snapshot.config);
    let defaults = infer_defaults(&snapshot.config);
    print!("{}", validation_report(&result, &defaults));

    if !result.is_valid() {
        anyhow::bail!("{} is invalid", path.display());
    }
    Ok(())
}

/// Problems (if any), the inferred defaults, then the verdict
fn validation_report(result: &ValidationResult, defaults: &SmartDefaults) -> String {
    let mut out = String::new();
    let has_messages = !result.errors().is_empty() || !result.warnings().is_empty();
    if has_messages {
        out.push_str(&result.to_string());
        out.push('\n');
    }

    let backend = defaults
        .backend
        .map(|b| b.to_string())
        .unwrap_or_else(|| "none".to_string());
    out.push_str(&format!("{}\n", "Smart defaults".cyan().bold()));
    out.push_str(&format!("  database: {}\n", backend));
    out.push_str(&format!("  website pricing: {}\n", defaults.include_pricing));
    out.push_str(&format!("  website auth: {}\n", defaults.include_auth));
    out.push_str(&format!("  website testimonials: {}\n", defaults.include_testimonials));
    out.push_str(&format!("  website framework: {}\n", defaults.website_framework));

    if result.is_valid() {
        out.push_str(&format!("\n{}\n", "Configuration is valid.".green().bold()));
    }
    out
}

fn run_features(config: &ForgeConfig, args: FeaturesArgs) -> Result<()> {
    let scaffolder = scaffolder_for(config, &args.template_dir);
    let features = scaffolder.available_features()?;

    if features.is_empty() {
        println!(
            "{} No template sets found in {}",
            "Warning:".yellow(),
            scaffolder.template_root().display()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Template sets in {}", scaffolder.template_root().display())
            .cyan()
            .bold()
    );
    for feature in features {
        println!("  {} {}", "->".blue(), feature);
    }
    Ok(())
}

fn run_wizard(config: &ForgeConfig, args: InitArgs) -> Result<()> {
    let wizard_args = WizardArgs::try_from(args).context("Invalid flag value")?;
    let result = forge_core::run(config, wizard_args);

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let config = ForgeConfig;

    match args.command {
        Some(Command::Init(init_args)) => run_wizard(&config, init_args),
        Some(Command::Scaffold(scaffold_args)) => run_scaffold(&config, scaffold_args),
        Some(Command::Validate(validate_args)) => run_validate(&config, validate_args),
        Some(Command::Features(features_args)) => run_features(&config, features_args),
        // No subcommand provided, default to the interactive wizard
        None => run_wizard(&config, InitArgs::default()),
    }
}
