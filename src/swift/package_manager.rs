//! Swift Package Manager resolver
//!
//! Implements `PackageResolver` by driving `swift package` subcommands and
//! parsing their JSON output.

use crate::error::{CartonError, CartonResult};
use crate::platform::Platform;
use crate::swift::exec;
use crate::swift::resolver::{PackageDependency, PackageInfo, PackageResolver};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `PackageResolver` backed by the `swift` command line tool
pub struct SwiftPackageManager {
    swift: PathBuf,
}

impl SwiftPackageManager {
    /// Create a resolver that runs the given `swift` binary
    pub fn new(swift: impl Into<PathBuf>) -> Self {
        Self {
            swift: swift.into(),
        }
    }

    fn package_args(package_path: &Path, subcommand: &[&str]) -> Vec<String> {
        let mut args = vec![
            "package".to_string(),
            "--package-path".to_string(),
            package_path.display().to_string(),
        ];
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args
    }
}

impl Default for SwiftPackageManager {
    fn default() -> Self {
        Self::new("swift")
    }
}

/// Output of `swift package dump-package` (only the fields we read)
#[derive(Debug, Deserialize)]
struct DumpedPackage {
    name: String,
    #[serde(default)]
    platforms: Vec<DumpedPlatform>,
    #[serde(default)]
    products: Vec<DumpedProduct>,
}

#[derive(Debug, Deserialize)]
struct DumpedPlatform {
    #[serde(rename = "platformName")]
    platform_name: String,
}

#[derive(Debug, Deserialize)]
struct DumpedProduct {
    name: String,
    #[serde(rename = "type")]
    kind: serde_json::Value,
}

/// Parse `show-dependencies --format json` output, dropping the root package
pub(crate) fn parse_dependencies(json: &str) -> CartonResult<Vec<PackageDependency>> {
    let root: PackageDependency =
        serde_json::from_str(json).map_err(|e| CartonError::ResolverOutput {
            command: "swift package show-dependencies".to_string(),
            reason: e.to_string(),
        })?;
    Ok(root.dependencies)
}

/// Parse `dump-package` output into `PackageInfo`
pub(crate) fn parse_package_info(json: &str) -> CartonResult<PackageInfo> {
    let dumped: DumpedPackage =
        serde_json::from_str(json).map_err(|e| CartonError::ResolverOutput {
            command: "swift package dump-package".to_string(),
            reason: e.to_string(),
        })?;

    // Platforms we cannot build for (linux, maccatalyst, ...) are ignored
    let declared: BTreeSet<Platform> = dumped
        .platforms
        .iter()
        .filter_map(|p| p.platform_name.parse().ok())
        .collect();

    let platforms = if dumped.platforms.is_empty() {
        Platform::all().iter().copied().collect()
    } else {
        declared
    };

    let products = dumped
        .products
        .into_iter()
        .filter(|p| p.kind.get("library").is_some())
        .map(|p| p.name)
        .collect();

    Ok(PackageInfo {
        name: dumped.name,
        platforms,
        products,
    })
}

#[async_trait]
impl PackageResolver for SwiftPackageManager {
    async fn resolve(&self, workspace: &Path) -> CartonResult<()> {
        info!(workspace = %workspace.display(), "Resolving Swift packages");
        exec(&self.swift, &Self::package_args(workspace, &["resolve"])).await?;
        Ok(())
    }

    async fn load_dependencies(&self, workspace: &Path) -> CartonResult<Vec<PackageDependency>> {
        let stdout = exec(
            &self.swift,
            &Self::package_args(workspace, &["show-dependencies", "--format", "json"]),
        )
        .await?;
        let dependencies = parse_dependencies(&stdout)?;
        debug!(count = dependencies.len(), "Loaded dependency tree");
        Ok(dependencies)
    }

    async fn load_package_info(&self, source: &Path) -> CartonResult<PackageInfo> {
        let stdout = exec(&self.swift, &Self::package_args(source, &["dump-package"])).await?;
        parse_package_info(&stdout)
    }

    async fn generate_project(&self, source: &Path, output: &Path) -> CartonResult<()> {
        let output_arg = output.display().to_string();
        exec(
            &self.swift,
            &Self::package_args(source, &["generate-xcodeproj", "--output", &output_arg]),
        )
        .await?;
        debug!(source = %source.display(), output = %output.display(), "Generated Xcode project");
        Ok(())
    }
}
