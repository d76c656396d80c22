//! Fetch command - resolve, build and cache dependencies

use crate::cli::args::FetchArgs;
use crate::cli::commands::ProjectLocation;
use crate::config::Config;
use crate::error::CartonResult;
use crate::interactor::{self, DependenciesInteractor};
use crate::manifest::DependenciesManifest;
use crate::platform::Platform;
use crate::swift::{SwiftPackageManager, XcodeFrameworkBuilder};
use crate::ui::{self, TaskSpinner, UiContext};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> CartonResult<()> {
    let ctx = UiContext::detect();
    let location = ProjectLocation::resolve(&args.project, config)?;
    let manifest = DependenciesManifest::from_file(&location.manifest_path).await?;
    let platforms = requested_platforms(&args.platforms, &manifest, config);

    ui::intro(&ctx, "Fetching dependencies");
    ui::key_value(&ctx, "Cache", &location.cache_root.display().to_string());
    ui::key_value(&ctx, "Platforms", &platform_list(&platforms));

    if manifest.swift_package_manager.packages.is_empty() {
        interactor::clean(&location.cache_root).await?;
        ui::step_info(&ctx, "No Swift packages declared, cache cleaned");
        return Ok(());
    }

    let content = manifest
        .swift_package_manager
        .manifest_value(&location.project_dir);
    debug!(packages = manifest.swift_package_manager.packages.len(), "Rendered Package.swift");

    let interactor = DependenciesInteractor::new(
        Arc::new(SwiftPackageManager::new(config.tools.swift.clone())),
        Arc::new(XcodeFrameworkBuilder::new(config.tools.xcodebuild.clone())),
    );

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Resolving and building Swift packages...");
    let report = match interactor
        .fetch(&location.cache_root, &content, &platforms)
        .await
    {
        Ok(report) => {
            spinner.stop("Packages resolved and fetched");
            report
        }
        Err(e) => {
            spinner.stop_error("Fetch failed");
            return Err(e);
        }
    };

    for framework in &report.frameworks {
        let name = framework
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| framework.display().to_string());
        ui::step_ok(&ctx, &name);
    }
    for package in &report.skipped {
        ui::step_skip(&ctx, package, "supports none of the requested platforms");
    }

    ui::outro_success(
        &ctx,
        &format!("{} xcframework(s) cached", report.frameworks.len()),
    );
    Ok(())
}

/// CLI platforms win over the manifest, which wins over the config default
fn requested_platforms(
    cli: &[Platform],
    manifest: &DependenciesManifest,
    config: &Config,
) -> BTreeSet<Platform> {
    if !cli.is_empty() {
        cli.iter().copied().collect()
    } else if !manifest.platforms.is_empty() {
        manifest.platforms.clone()
    } else {
        config.fetch.default_platforms.iter().copied().collect()
    }
}

fn platform_list(platforms: &BTreeSet<Platform>) -> String {
    platforms
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
