//! Dependencies manifest
//!
//! A project lists its Swift packages in `Dependencies.toml`. The list is
//! rendered into the `Package.swift` the resolver reads.

use crate::error::{CartonError, CartonResult};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Default manifest file name at the project root
pub const DEFAULT_MANIFEST_FILE: &str = "Dependencies.toml";

/// Parsed `Dependencies.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependenciesManifest {
    /// Platforms to build frameworks for
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,

    /// Swift Package Manager section
    #[serde(default)]
    pub swift_package_manager: SwiftPackageManagerDependencies,
}

/// Packages fetched with the Swift Package Manager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwiftPackageManagerDependencies {
    /// `swift-tools-version` written to the generated manifest
    pub tools_version: String,

    pub packages: Vec<PackageRequirement>,
}

impl Default for SwiftPackageManagerDependencies {
    fn default() -> Self {
        Self {
            tools_version: "5.3".to_string(),
            packages: Vec::new(),
        }
    }
}

/// One package: remote (`url` + `requirement`) or local (`path`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Requirement>,
}

/// Version requirement of a remote package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Exact(String),
    UpToNextMajor(String),
    UpToNextMinor(String),
    Range { from: String, to: String },
    Branch(String),
    Revision(String),
}

impl Requirement {
    fn manifest_value(&self) -> String {
        match self {
            Self::Exact(v) => format!(".exact({})", quoted(v)),
            Self::UpToNextMajor(v) => format!(".upToNextMajor(from: {})", quoted(v)),
            Self::UpToNextMinor(v) => format!(".upToNextMinor(from: {})", quoted(v)),
            Self::Range { from, to } => format!("{}..<{}", quoted(from), quoted(to)),
            Self::Branch(b) => format!(".branch({})", quoted(b)),
            Self::Revision(r) => format!(".revision({})", quoted(r)),
        }
    }
}

impl DependenciesManifest {
    /// Load and validate a manifest from disk
    pub async fn from_file(path: &Path) -> CartonResult<Self> {
        if !path.exists() {
            return Err(CartonError::ManifestNotFound(path.to_path_buf()));
        }
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CartonError::io(format!("reading dependencies manifest {}", path.display()), e)
        })?;
        Self::parse(&content, path)
    }

    /// Parse and validate manifest content; `origin` is used in errors only
    pub fn parse(content: &str, origin: &Path) -> CartonResult<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| CartonError::ManifestInvalid {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        manifest.validate(origin)?;
        Ok(manifest)
    }

    fn validate(&self, origin: &Path) -> CartonResult<()> {
        let invalid = |reason: String| CartonError::ManifestInvalid {
            path: origin.to_path_buf(),
            reason,
        };

        for (index, package) in self.swift_package_manager.packages.iter().enumerate() {
            match (&package.url, &package.path) {
                (Some(_), Some(_)) => {
                    return Err(invalid(format!(
                        "package #{} sets both url and path",
                        index + 1
                    )))
                }
                (None, None) => {
                    return Err(invalid(format!(
                        "package #{} needs a url or a path",
                        index + 1
                    )))
                }
                (Some(url), None) if url.trim().is_empty() => {
                    return Err(invalid(format!("package #{} has an empty url", index + 1)))
                }
                (Some(url), None) if package.requirement.is_none() => {
                    return Err(invalid(format!("package {} has no requirement", url)))
                }
                (None, Some(path)) if path.as_os_str().is_empty() => {
                    return Err(invalid(format!("package #{} has an empty path", index + 1)))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl SwiftPackageManagerDependencies {
    /// Render the `Package.swift` content
    ///
    /// Relative local paths are resolved against `project_dir` because the
    /// manifest is evaluated from a temporary workspace.
    pub fn manifest_value(&self, project_dir: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "// swift-tools-version:{}", self.tools_version);
        out.push('\n');
        out.push_str("import PackageDescription\n\n");
        out.push_str("let package = Package(\n");
        out.push_str("    name: \"PackageName\",\n");
        out.push_str("    dependencies: [\n");

        for package in &self.packages {
            let line = match (&package.url, &package.path, &package.requirement) {
                (Some(url), _, Some(requirement)) => format!(
                    ".package(url: {}, {})",
                    quoted(url),
                    requirement.manifest_value()
                ),
                (_, Some(path), _) => {
                    let path = if path.is_absolute() {
                        path.clone()
                    } else {
                        project_dir.join(path)
                    };
                    format!(".package(path: {})", quoted(&path.display().to_string()))
                }
                // rejected by validation
                _ => continue,
            };
            let _ = writeln!(out, "        {},", line);
        }

        out.push_str("    ]\n");
        out.push_str(")\n");
        out
    }
}

/// Swift string literal
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
