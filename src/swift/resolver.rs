//! Package resolver abstraction
//!
//! The fetch pipeline talks to the package manager through this trait so
//! the Swift Package Manager can be swapped for a fake in tests.

use crate::error::CartonResult;
use crate::platform::Platform;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// A resolved dependency: its name and where its sources were checked out
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyDescriptor {
    pub name: String,
    pub path: PathBuf,
}

/// Node of the resolved dependency tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub dependencies: Vec<PackageDependency>,
}

impl PackageDependency {
    pub fn descriptor(&self) -> DependencyDescriptor {
        DependencyDescriptor {
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }
}

/// Flatten a dependency tree into its unique descriptors.
///
/// Traversal is depth-first, parents before children; when the same
/// package appears more than once the first occurrence is kept.
pub fn unique_dependencies(tree: &[PackageDependency]) -> Vec<DependencyDescriptor> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut stack: Vec<&PackageDependency> = tree.iter().rev().collect();

    while let Some(node) = stack.pop() {
        let descriptor = node.descriptor();
        if seen.insert(descriptor.clone()) {
            unique.push(descriptor);
        }
        stack.extend(node.dependencies.iter().rev());
    }

    unique
}

/// Metadata of one package, read from its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    /// Platforms the package declares; every platform when it declares none
    pub platforms: BTreeSet<Platform>,
    /// Library products, in manifest order
    pub products: Vec<String>,
}

impl PackageInfo {
    /// Platforms both supported by the package and requested by the caller
    pub fn buildable_platforms(&self, requested: &BTreeSet<Platform>) -> BTreeSet<Platform> {
        self.platforms.intersection(requested).copied().collect()
    }

    /// Names of the frameworks to build: library products, or the package itself
    pub fn framework_names(&self) -> Vec<String> {
        if self.products.is_empty() {
            vec![self.name.clone()]
        } else {
            self.products.clone()
        }
    }
}

/// External package resolver
#[async_trait]
pub trait PackageResolver: Send + Sync {
    /// Resolve and check out the dependencies declared by the manifest in `workspace`
    async fn resolve(&self, workspace: &Path) -> CartonResult<()>;

    /// Load the resolved dependency tree (the root package excluded)
    async fn load_dependencies(&self, workspace: &Path) -> CartonResult<Vec<PackageDependency>>;

    /// Load the metadata of the package checked out at `source`
    async fn load_package_info(&self, source: &Path) -> CartonResult<PackageInfo>;

    /// Generate an Xcode project for the package at `source` into `output`
    async fn generate_project(&self, source: &Path, output: &Path) -> CartonResult<()>;
}
