//! Materialize a named template set into a project directory
//!
//! Template sets live under a root directory, one subdirectory per feature:
//!
//! ```text
//! scaffold-templates/
//!   auth/
//!     login.html
//!     README.md
//!   pricing/
//!     plans.json
//! ```
//!
//! Every file of the set is rendered through [`render_template`] and written to
//! the same relative path under the target directory. Existing files are
//! overwritten. Each non-dry run appends one section to the report file.

use super::render::render_template;
use crate::product::ProductConfig;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Template root used when neither the caller nor the environment names one
pub const DEFAULT_TEMPLATE_DIR: &str = "scaffold-templates";

/// Report file used when the caller does not name one
pub const DEFAULT_REPORT_FILE: &str = "docs/scaffold-report.md";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(
        "Template set '{feature}' not found in {}.{}",
        .root.display(),
        available_hint(.available)
    )]
    TemplateSetNotFound {
        feature: String,
        root: PathBuf,
        available: Vec<String>,
    },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Template file {} is not valid UTF-8", .path.display())]
    NonUtf8Template { path: PathBuf },
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" Available template sets: {}", available.join(", "))
    }
}

fn io_error<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> ScaffoldError + 'a {
    move |source| ScaffoldError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

/// Inputs of a single scaffold run
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    pub feature: String,
    pub variables: HashMap<String, String>,
    /// Defaults to the current directory; destinations are then bare relative paths
    pub target_dir: Option<PathBuf>,
    pub dry_run: bool,
    /// Defaults to [`DEFAULT_REPORT_FILE`], relative to the current directory
    pub report_file: Option<PathBuf>,
}

impl ScaffoldOptions {
    pub fn new(feature: impl Into<String>, variables: HashMap<String, String>) -> Self {
        Self {
            feature: feature.into(),
            variables,
            ..Default::default()
        }
    }

    pub fn target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn report_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_file = Some(path.into());
        self
    }

    fn resolved_target_dir(&self) -> PathBuf {
        self.target_dir.clone().unwrap_or_default()
    }

    fn resolved_report_file(&self) -> PathBuf {
        self.report_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE))
    }
}

/// One processed template file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldEntry {
    /// Path relative to the template set directory
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// What a scaffold run did (or would do, in dry-run mode)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub feature: String,
    pub dry_run: bool,
    pub entries: Vec<ScaffoldEntry>,
}

impl ScaffoldReport {
    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.destination.as_path())
    }
}

impl fmt::Display for ScaffoldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Scaffold Report for feature: {}", self.feature)?;
        let action = if self.dry_run {
            "[DRY RUN] Would create"
        } else {
            "Created"
        };
        for entry in &self.entries {
            writeln!(f, "- {}: {}", action, entry.destination.display())?;
        }
        Ok(())
    }
}

/// Scaffold engine bound to one template root
#[derive(Debug, Clone)]
pub struct Scaffolder {
    template_root: PathBuf,
}

impl Scaffolder {
    pub fn new(template_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
        }
    }

    /// Template root from the product's environment override, else its default
    pub fn from_config<C: ProductConfig>(config: &C) -> Self {
        let root = std::env::var(config.template_dir_env())
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| config.default_template_dir().to_string());
        Self::new(root)
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Names of the template sets under the root, sorted
    pub fn available_features(&self) -> Result<Vec<String>, ScaffoldError> {
        let entries = match fs::read_dir(&self.template_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("read template directory", &self.template_root)(e)),
        };

        let mut features = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error("read template directory", &self.template_root))?;
            if entry.path().is_dir() {
                features.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        features.sort();
        Ok(features)
    }

    /// Directory holding the template set for `feature`
    pub fn template_set_dir(&self, feature: &str) -> Result<PathBuf, ScaffoldError> {
        let mut components = Path::new(feature).components();
        let is_plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        let dir = self.template_root.join(feature);
        if is_plain_name && dir.is_dir() {
            return Ok(dir);
        }

        Err(ScaffoldError::TemplateSetNotFound {
            feature: feature.to_string(),
            root: self.template_root.clone(),
            available: self.available_features().unwrap_or_default(),
        })
    }

    /// Files of a template set, relative to its directory and sorted
    pub fn template_files(&self, feature: &str) -> Result<Vec<PathBuf>, ScaffoldError> {
        let dir = self.template_set_dir(feature)?;
        collect_files(&dir)
    }

    /// Render every file of a template set into the target directory
    ///
    /// In dry-run mode the filesystem is only read; the returned report is
    /// the caller's to display.
    pub fn scaffold(&self, options: &ScaffoldOptions) -> Result<ScaffoldReport, ScaffoldError> {
        let set_dir = self.template_set_dir(&options.feature)?;
        let target_dir = options.resolved_target_dir();

        let mut report = ScaffoldReport {
            feature: options.feature.clone(),
            dry_run: options.dry_run,
            entries: Vec::new(),
        };

        for relative in collect_files(&set_dir)? {
            let source_path = set_dir.join(&relative);
            let bytes = fs::read(&source_path).map_err(io_error("read", &source_path))?;
            let content = String::from_utf8(bytes).map_err(|_| ScaffoldError::NonUtf8Template {
                path: source_path.clone(),
            })?;
            let rendered = render_template(&content, &options.variables);
            let destination = target_dir.join(&relative);

            if !options.dry_run {
                let parent = destination.parent().filter(|p| !p.as_os_str().is_empty());
                if let Some(parent) = parent {
                    fs::create_dir_all(parent).map_err(io_error("create directory", parent))?;
                }
                fs::write(&destination, rendered).map_err(io_error("write", &destination))?;
            }
            tracing::debug!(
                feature = %options.feature,
                destination = %destination.display(),
                dry_run = options.dry_run,
                "processed template file"
            );

            report.entries.push(ScaffoldEntry {
                source: relative,
                destination,
            });
        }

        if !options.dry_run {
            append_report(&options.resolved_report_file(), &report)?;
        }
        tracing::info!(
            feature = %options.feature,
            files = report.entries.len(),
            dry_run = options.dry_run,
            "scaffold finished"
        );

        Ok(report)
    }
}

/// Recursive listing; a flat set maps each file to `<target>/<file>`
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ScaffoldError::Io {
                action: "read template set",
                path,
                source: e.into(),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Append one report section in a single write
fn append_report(path: &Path, report: &ScaffoldReport) -> Result<(), ScaffoldError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error("create directory", parent))?;
    }

    let section = format!("{}\n", report);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error("open report file", path))?;
    file.write_all(section.as_bytes())
        .map_err(io_error("append to report file", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Template root with an `auth` set (flat) and a `site` set (nested)
    fn template_root() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let auth = dir.path().join("auth");
        fs::create_dir_all(&auth).unwrap();
        fs::write(auth.join("login.html"), "<h1>Sign in to {{name}}</h1>").unwrap();
        fs::write(auth.join("README.md"), "Auth via {{auth_methods}}{{unset}}\n").unwrap();

        let site = dir.path().join("site");
        fs::create_dir_all(site.join("pages")).unwrap();
        fs::write(site.join("index.html"), "{{name}}").unwrap();
        fs::write(site.join("pages/pricing.html"), "{{monetization}}").unwrap();
        dir
    }

    fn variables() -> HashMap<String, String> {
        [("name", "Focus"), ("auth_methods", "email"), ("monetization", "freemium")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_scaffold_writes_rendered_files_and_report() {
        let templates = template_root();
        let out = tempfile::tempdir().unwrap();
        let report_path = out.path().join("docs/scaffold-report.md");

        let report = Scaffolder::new(templates.path())
            .scaffold(
                &ScaffoldOptions::new("auth", variables())
                    .target_dir(out.path())
                    .report_file(&report_path),
            )
            .unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(
            fs::read_to_string(out.path().join("login.html")).unwrap(),
            "<h1>Sign in to Focus</h1>"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("README.md")).unwrap(),
            "Auth via email\n"
        );

        let logged = fs::read_to_string(&report_path).unwrap();
        assert!(logged.starts_with("# Scaffold Report for feature: auth\n"));
        let created = format!("- Created: {}", out.path().join("login.html").display());
        assert!(logged.contains(&created));
        assert!(logged.ends_with("\n\n"));
    }

    #[test]
    fn test_dry_run_lists_files_and_writes_nothing() {
        let templates = template_root();
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("project");
        let report_path = out.path().join("report.md");

        let report = Scaffolder::new(templates.path())
            .scaffold(
                &ScaffoldOptions::new("auth", variables())
                    .target_dir(&target)
                    .report_file(&report_path)
                    .dry_run(true),
            )
            .unwrap();

        let destinations: Vec<_> = report.destinations().map(Path::to_path_buf).collect();
        assert_eq!(
            destinations,
            vec![target.join("README.md"), target.join("login.html")]
        );
        assert!(report.to_string().contains("[DRY RUN] Would create"));
        assert!(!target.exists());
        assert!(!report_path.exists());
    }

    #[test]
    fn test_default_target_reports_bare_relative_paths() {
        let templates = template_root();
        let report = Scaffolder::new(templates.path())
            .scaffold(&ScaffoldOptions::new("site", variables()).dry_run(true))
            .unwrap();

        assert_eq!(
            report.to_string(),
            "# Scaffold Report for feature: site\n\
             - [DRY RUN] Would create: index.html\n\
             - [DRY RUN] Would create: pages/pricing.html\n"
        );
    }

    #[test]
    fn test_nested_sets_mirror_relative_layout() {
        let templates = template_root();
        let out = tempfile::tempdir().unwrap();

        Scaffolder::new(templates.path())
            .scaffold(
                &ScaffoldOptions::new("site", variables())
                    .target_dir(out.path())
                    .report_file(out.path().join("report.md")),
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("pages/pricing.html")).unwrap(),
            "freemium"
        );
        assert_eq!(fs::read_to_string(out.path().join("index.html")).unwrap(), "Focus");
    }

    #[test]
    fn test_existing_files_are_overwritten_and_report_appended() {
        let templates = template_root();
        let out = tempfile::tempdir().unwrap();
        let report_path = out.path().join("report.md");
        fs::write(out.path().join("login.html"), "old content").unwrap();

        let scaffolder = Scaffolder::new(templates.path());
        let options = ScaffoldOptions::new("auth", variables())
            .target_dir(out.path())
            .report_file(&report_path);
        scaffolder.scaffold(&options).unwrap();
        scaffolder.scaffold(&options).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("login.html")).unwrap(),
            "<h1>Sign in to Focus</h1>"
        );
        let logged = fs::read_to_string(&report_path).unwrap();
        assert_eq!(logged.matches("# Scaffold Report for feature: auth").count(), 2);
    }

    #[test]
    fn test_missing_feature_is_reported_with_available_sets() {
        let templates = template_root();
        let err = Scaffolder::new(templates.path())
            .scaffold(&ScaffoldOptions::new("payments", HashMap::new()))
            .unwrap_err();

        match &err {
            ScaffoldError::TemplateSetNotFound { feature, available, .. } => {
                assert_eq!(feature, "payments");
                assert_eq!(available, &["auth".to_string(), "site".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Available template sets: auth, site"));
    }

    #[test]
    fn test_feature_must_be_a_plain_name() {
        let templates = template_root();
        let scaffolder = Scaffolder::new(templates.path().join("auth"));

        for feature in ["..", "../site", "", "/tmp"] {
            assert!(matches!(
                scaffolder.template_set_dir(feature),
                Err(ScaffoldError::TemplateSetNotFound { .. })
            ));
        }
    }

    #[test]
    fn test_available_features_of_missing_root_is_empty() {
        let scaffolder = Scaffolder::new("/nonexistent/forge-templates");
        assert!(scaffolder.available_features().unwrap().is_empty());
    }

    #[test]
    fn test_non_utf8_template_is_rejected() {
        let templates = template_root();
        fs::write(templates.path().join("auth/logo.png"), [0xff, 0xfe, 0x00]).unwrap();
        let out = tempfile::tempdir().unwrap();

        let err = Scaffolder::new(templates.path())
            .scaffold(
                &ScaffoldOptions::new("auth", variables())
                    .target_dir(out.path())
                    .dry_run(true),
            )
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::NonUtf8Template { .. }));
    }
}
