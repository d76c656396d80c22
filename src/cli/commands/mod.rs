//! CLI command implementations

pub mod clean;
pub mod config;
pub mod fetch;
pub mod manifest;

pub use clean::execute as clean;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use manifest::execute as manifest;

use crate::cli::args::ProjectArgs;
use crate::config::Config;
use crate::error::{CartonError, CartonResult};
use std::path::{Path, PathBuf};

/// Where a project keeps its manifest and its dependencies cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    pub project_dir: PathBuf,
    pub cache_root: PathBuf,
    pub manifest_path: PathBuf,
}

impl ProjectLocation {
    /// Resolve the project location from CLI arguments and configuration
    pub fn resolve(args: &ProjectArgs, config: &Config) -> CartonResult<Self> {
        let project_dir = match &args.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .map_err(|e| CartonError::io("getting current directory", e))?,
        };
        Ok(Self::from_project_dir(&project_dir, args.cache_dir.as_deref(), config))
    }

    fn from_project_dir(project_dir: &Path, cache_dir: Option<&Path>, config: &Config) -> Self {
        let cache_dir = cache_dir.unwrap_or(&config.fetch.cache_dir);
        Self {
            project_dir: project_dir.to_path_buf(),
            cache_root: project_dir.join(cache_dir),
            manifest_path: project_dir.join(&config.fetch.manifest_file),
        }
    }
}
