//! Persisted configuration snapshots
//!
//! A snapshot is the flat YAML record the wizard leaves behind so later runs
//! (`validate`, `scaffold --from-snapshot`) can reuse the same choices.

use super::Configuration;
use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Format version written into every new snapshot
pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to {action} snapshot {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error(
        "Snapshot {} uses format version '{found}', which this CLI (format {supported}) cannot read",
        .path.display()
    )]
    UnsupportedVersion {
        path: PathBuf,
        found: String,
        supported: &'static str,
    },
}

/// A configuration plus when and in which format it was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub format_version: String,
    pub generated_at: DateTime<Utc>,
    pub config: Configuration,
}

impl ConfigSnapshot {
    pub fn new(config: Configuration) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION.to_string(),
            generated_at: Utc::now(),
            config,
        }
    }

    pub fn to_yaml(&self) -> Result<String, SnapshotError> {
        serde_yaml::to_string(self).map_err(SnapshotError::Serialize)
    }

    /// Write the snapshot, replacing any previous one. Returns the YAML text.
    ///
    /// In dry-run mode nothing touches the filesystem.
    pub fn save(&self, path: &Path, dry_run: bool) -> Result<String, SnapshotError> {
        let yaml = self.to_yaml()?;
        if dry_run {
            return Ok(yaml);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
                action: "create directory for",
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, &yaml).map_err(|source| SnapshotError::Io {
            action: "write",
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved configuration snapshot");

        Ok(yaml)
    }

    /// Read a snapshot and reject formats this build cannot interpret
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: ConfigSnapshot =
            serde_yaml::from_str(&content).map_err(|source| SnapshotError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if !is_readable_format(&snapshot.format_version) {
            return Err(SnapshotError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: snapshot.format_version,
                supported: SNAPSHOT_FORMAT_VERSION,
            });
        }

        Ok(snapshot)
    }

    /// Warning for snapshots written by a newer CLI within the same major format
    pub fn compatibility_warning(&self) -> Option<String> {
        check_compatibility(SNAPSHOT_FORMAT_VERSION, &self.format_version)
    }
}

fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}

/// Same major version as the supported format
fn is_readable_format(found: &str) -> bool {
    match (parse_version(SNAPSHOT_FORMAT_VERSION), parse_version(found)) {
        (Some(supported), Some(found)) => supported.major == found.major,
        _ => false,
    }
}

/// Returns a warning when the snapshot format is newer than the supported one
fn check_compatibility(supported: &str, found: &str) -> Option<String> {
    let supported_ver = parse_version(supported)?;
    let found_ver = parse_version(found)?;

    if supported_ver < found_ver {
        Some(format!(
            "Snapshot format {} is newer than the supported format {}. \
             Fields added since then are ignored.",
            found, supported
        ))
    } else {
        None
    }
}
