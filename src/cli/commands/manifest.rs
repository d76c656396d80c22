//! Manifest command - print the generated Package.swift

use crate::cli::args::ProjectArgs;
use crate::cli::commands::ProjectLocation;
use crate::config::Config;
use crate::error::CartonResult;
use crate::manifest::DependenciesManifest;

/// Execute the manifest command
pub async fn execute(args: ProjectArgs, config: &Config) -> CartonResult<()> {
    let location = ProjectLocation::resolve(&args, config)?;
    let manifest = DependenciesManifest::from_file(&location.manifest_path).await?;

    print!(
        "{}",
        manifest
            .swift_package_manager
            .manifest_value(&location.project_dir)
    );
    Ok(())
}
