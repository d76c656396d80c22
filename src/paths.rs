//! Locations used by a single fetch
//!
//! Every path is derived from two roots: the persistent dependencies
//! directory owned by the project and the ephemeral workspace the
//! resolver runs in.

use std::path::{Path, PathBuf};

/// Directory under the cache root holding lockfiles
pub const LOCKFILES_DIRECTORY: &str = "Lockfiles";
/// Directory under the cache root holding the build directory and frameworks
pub const SWIFT_PACKAGE_MANAGER_DIRECTORY: &str = "SwiftPackageManager";
/// Lockfile written by the resolver
pub const PACKAGE_RESOLVED: &str = "Package.resolved";
/// Resolver build directory
pub const BUILD_DIRECTORY: &str = ".build";
/// Manifest file the resolver reads
pub const PACKAGE_MANIFEST: &str = "Package.swift";

/// Persistent and ephemeral paths for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPaths {
    pub workspace: PathBuf,

    pub destination_lockfile: PathBuf,
    pub destination_directory: PathBuf,
    pub destination_build_directory: PathBuf,

    pub workspace_lockfile: PathBuf,
    pub workspace_build_directory: PathBuf,
    pub workspace_manifest: PathBuf,
}

impl FetchPaths {
    pub fn new(cache_root: &Path, workspace: &Path) -> Self {
        let destination_directory = swift_package_manager_directory(cache_root);
        Self {
            workspace: workspace.to_path_buf(),
            destination_lockfile: lockfile_path(cache_root),
            destination_build_directory: destination_directory.join(BUILD_DIRECTORY),
            destination_directory,
            workspace_lockfile: workspace.join(PACKAGE_RESOLVED),
            workspace_build_directory: workspace.join(BUILD_DIRECTORY),
            workspace_manifest: workspace.join(PACKAGE_MANIFEST),
        }
    }

    /// Where a built framework lands in the persistent cache
    pub fn destination_for(&self, artifact: &Path) -> Option<PathBuf> {
        artifact
            .file_name()
            .map(|name| self.destination_directory.join(name))
    }
}

/// `<cache_root>/SwiftPackageManager`
pub fn swift_package_manager_directory(cache_root: &Path) -> PathBuf {
    cache_root.join(SWIFT_PACKAGE_MANAGER_DIRECTORY)
}

/// `<cache_root>/Lockfiles/Package.resolved`
pub fn lockfile_path(cache_root: &Path) -> PathBuf {
    cache_root.join(LOCKFILES_DIRECTORY).join(PACKAGE_RESOLVED)
}
