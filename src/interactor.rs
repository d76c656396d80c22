//! Fetch pipeline for Swift Package Manager dependencies
//!
//! A fetch runs entirely inside an ephemeral workspace:
//!
//! 1. restore: seed the workspace with the previous lockfile and `.build`
//!    directory (warm start) and write `Package.swift`
//! 2. resolve and build: run the resolver, then generate a project and
//!    build xcframeworks for every unique dependency that supports one of
//!    the requested platforms
//! 3. commit: check the resolver left a lockfile and a build directory,
//!    then replace the persistent cache with the workspace results
//!
//! Nothing under the cache root is touched before step 3 validation
//! passes. Steps inside the commit are not one transaction: a crash while
//! copying can leave a partially updated cache, which the next fetch
//! overwrites.
//!
//! The cache root must not be used by two fetch/clean calls at once.

use crate::error::{CartonError, CartonResult};
use crate::fs;
use crate::paths::{self, FetchPaths};
use crate::platform::Platform;
use crate::swift::{unique_dependencies, FrameworkBuilder, PackageResolver};
use crate::workspace::Workspace;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// What a successful fetch committed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Committed lockfile
    pub lockfile: PathBuf,
    /// Committed framework bundles, in build order
    pub frameworks: Vec<PathBuf>,
    /// Packages skipped because they support none of the requested platforms
    pub skipped: Vec<String>,
}

/// Output of the resolution and build loop
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub artifacts: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

/// Fetches, builds and caches Swift Package Manager dependencies
pub struct DependenciesInteractor {
    resolver: Arc<dyn PackageResolver>,
    builder: Arc<dyn FrameworkBuilder>,
    workspace_parent: Option<PathBuf>,
}

impl DependenciesInteractor {
    pub fn new(resolver: Arc<dyn PackageResolver>, builder: Arc<dyn FrameworkBuilder>) -> Self {
        Self {
            resolver,
            builder,
            workspace_parent: None,
        }
    }

    /// Create workspaces under `dir` instead of the system temp directory
    pub fn with_workspace_parent(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_parent = Some(dir.into());
        self
    }

    /// Fetch the dependencies described by `manifest` into `cache_root`
    pub async fn fetch(
        &self,
        cache_root: &Path,
        manifest: &str,
        platforms: &BTreeSet<Platform>,
    ) -> CartonResult<FetchReport> {
        let span = info_span!("fetch", cache_root = %cache_root.display());

        async move {
            info!("Resolving and fetching Swift Package Manager dependencies");

            let workspace = match &self.workspace_parent {
                Some(parent) => Workspace::acquire_in(parent)?,
                None => Workspace::acquire()?,
            };
            let paths = FetchPaths::new(cache_root, workspace.path());

            let result = self.fetch_in(&paths, manifest, platforms).await;

            // A leftover workspace does not undo a commit
            if let Err(e) = workspace.close() {
                debug!(error = %e, "Workspace left behind");
            }

            let report = result?;
            info!(
                frameworks = report.frameworks.len(),
                skipped = report.skipped.len(),
                "Packages resolved and fetched successfully"
            );
            Ok::<FetchReport, CartonError>(report)
        }
        .instrument(span)
        .await
    }

    async fn fetch_in(
        &self,
        paths: &FetchPaths,
        manifest: &str,
        platforms: &BTreeSet<Platform>,
    ) -> CartonResult<FetchReport> {
        restore(paths, manifest).await?;
        let outcome = self.resolve_and_build(&paths.workspace, platforms).await?;
        let frameworks = commit(paths, &outcome.artifacts).await?;

        Ok(FetchReport {
            lockfile: paths.destination_lockfile.clone(),
            frameworks,
            skipped: outcome.skipped,
        })
    }

    /// Run the resolver in `workspace` and build frameworks for every unique
    /// dependency supporting at least one of `platforms`
    pub async fn resolve_and_build(
        &self,
        workspace: &Path,
        platforms: &BTreeSet<Platform>,
    ) -> CartonResult<BuildOutcome> {
        self.resolver.resolve(workspace).await?;

        let tree = self.resolver.load_dependencies(workspace).await?;
        let dependencies = unique_dependencies(&tree);
        debug!(count = dependencies.len(), "Unique dependencies");

        let mut outcome = BuildOutcome::default();
        for dependency in dependencies {
            let package = self.resolver.load_package_info(&dependency.path).await?;

            if package.buildable_platforms(platforms).is_empty() {
                info!(
                    package = %dependency.name,
                    "Package does not support requested platforms, skipping xcframework build"
                );
                outcome.skipped.push(dependency.name);
                continue;
            }

            let package_directory = workspace.join(&package.name);
            fs::create_dir_all(&package_directory).await?;

            self.resolver
                .generate_project(&dependency.path, &package_directory)
                .await?;

            let built = self
                .builder
                .build(&package_directory, &package, platforms)
                .await?;
            debug!(package = %package.name, count = built.len(), "Built frameworks");
            outcome.artifacts.extend(built);
        }

        Ok(outcome)
    }
}

/// Seed the workspace from the persistent cache and write the manifest
pub async fn restore(paths: &FetchPaths, manifest: &str) -> CartonResult<()> {
    if fs::exists(&paths.destination_build_directory).await {
        debug!("Restoring .build directory from previous fetch");
        fs::place(
            &paths.destination_build_directory,
            &paths.workspace_build_directory,
        )
        .await?;
    }

    if fs::exists(&paths.destination_lockfile).await {
        debug!("Restoring Package.resolved from previous fetch");
        fs::place(&paths.destination_lockfile, &paths.workspace_lockfile).await?;
    }

    fs::write_atomic(&paths.workspace_manifest, manifest).await?;
    debug!(manifest = %manifest, "Wrote Package.swift");
    Ok(())
}

/// Validate the resolver output and replace the persistent cache with it.
///
/// Returns the committed framework paths.
pub async fn commit(paths: &FetchPaths, artifacts: &[PathBuf]) -> CartonResult<Vec<PathBuf>> {
    if !fs::exists(&paths.workspace_lockfile).await {
        return Err(CartonError::LockfileMissing {
            path: paths.workspace_lockfile.clone(),
        });
    }
    if !fs::exists(&paths.workspace_build_directory).await {
        return Err(CartonError::BuildDirectoryMissing {
            path: paths.workspace_build_directory.clone(),
        });
    }

    let destinations = artifacts
        .iter()
        .map(|artifact| {
            paths.destination_for(artifact).ok_or_else(|| {
                CartonError::User(format!("{} has no file name", artifact.display()))
            })
        })
        .collect::<CartonResult<Vec<_>>>()?;

    fs::remove_all(&paths.destination_directory).await?;

    fs::place(&paths.workspace_lockfile, &paths.destination_lockfile).await?;
    fs::place(
        &paths.workspace_build_directory,
        &paths.destination_build_directory,
    )
    .await?;

    for (artifact, destination) in artifacts.iter().zip(&destinations) {
        fs::place(artifact, destination).await?;
        info!(framework = %destination.display(), "Saved xcframework");
    }

    Ok(destinations)
}

/// Remove the cached package directory and lockfile; absent paths are fine
pub async fn clean(cache_root: &Path) -> CartonResult<()> {
    fs::remove_all(&paths::swift_package_manager_directory(cache_root)).await?;
    fs::remove_all(&paths::lockfile_path(cache_root)).await?;
    info!(cache_root = %cache_root.display(), "Cleaned Swift Package Manager dependencies");
    Ok(())
}
