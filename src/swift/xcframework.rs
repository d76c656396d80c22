//! XCFramework builder
//!
//! Archives every framework of a generated project once per SDK and
//! combines the archives into one `.xcframework` per framework.

use crate::error::CartonResult;
use crate::platform::Platform;
use crate::swift::exec;
use crate::swift::resolver::PackageInfo;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Builds binary framework bundles from a generated project
#[async_trait]
pub trait FrameworkBuilder: Send + Sync {
    /// Build frameworks for `package` from the project generated in
    /// `project_dir`, returning the paths of the produced bundles
    async fn build(
        &self,
        project_dir: &Path,
        package: &PackageInfo,
        platforms: &BTreeSet<Platform>,
    ) -> CartonResult<Vec<PathBuf>>;
}

/// `FrameworkBuilder` backed by `xcodebuild`
pub struct XcodeFrameworkBuilder {
    xcodebuild: PathBuf,
}

impl XcodeFrameworkBuilder {
    pub fn new(xcodebuild: impl Into<PathBuf>) -> Self {
        Self {
            xcodebuild: xcodebuild.into(),
        }
    }

    fn archive_path(project_dir: &Path, framework: &str, sdk: &str) -> PathBuf {
        project_dir
            .join("archives")
            .join(format!("{}-{}.xcarchive", framework, sdk))
    }

    /// Arguments of `xcodebuild archive` for one framework and SDK
    fn archive_args(
        project_dir: &Path,
        package: &PackageInfo,
        framework: &str,
        sdk: &str,
    ) -> Vec<String> {
        let project = project_dir.join(format!("{}.xcodeproj", package.name));
        vec![
            "archive".to_string(),
            "-project".to_string(),
            project.display().to_string(),
            "-scheme".to_string(),
            framework.to_string(),
            "-sdk".to_string(),
            sdk.to_string(),
            "-archivePath".to_string(),
            Self::archive_path(project_dir, framework, sdk)
                .display()
                .to_string(),
            "SKIP_INSTALL=NO".to_string(),
            "BUILD_LIBRARY_FOR_DISTRIBUTION=YES".to_string(),
        ]
    }

    /// Arguments of `xcodebuild -create-xcframework` combining the archives
    fn create_xcframework_args(
        project_dir: &Path,
        framework: &str,
        sdks: &[&str],
        output: &Path,
    ) -> Vec<String> {
        let mut args = vec!["-create-xcframework".to_string()];
        for sdk in sdks {
            let framework_path = Self::archive_path(project_dir, framework, sdk)
                .join("Products")
                .join("Library")
                .join("Frameworks")
                .join(format!("{}.framework", framework));
            args.push("-framework".to_string());
            args.push(framework_path.display().to_string());
        }
        args.push("-output".to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Default for XcodeFrameworkBuilder {
    fn default() -> Self {
        Self::new("xcodebuild")
    }
}

#[async_trait]
impl FrameworkBuilder for XcodeFrameworkBuilder {
    async fn build(
        &self,
        project_dir: &Path,
        package: &PackageInfo,
        platforms: &BTreeSet<Platform>,
    ) -> CartonResult<Vec<PathBuf>> {
        let sdks: Vec<&str> = package
            .buildable_platforms(platforms)
            .iter()
            .flat_map(|p| p.sdks().iter().copied())
            .collect();

        if sdks.is_empty() {
            return Ok(Vec::new());
        }

        let mut built = Vec::new();
        for framework in package.framework_names() {
            for sdk in &sdks {
                debug!(framework = %framework, sdk = %sdk, "Archiving");
                exec(
                    &self.xcodebuild,
                    &Self::archive_args(project_dir, package, &framework, sdk),
                )
                .await?;
            }

            let output = project_dir.join(format!("{}.xcframework", framework));
            exec(
                &self.xcodebuild,
                &Self::create_xcframework_args(project_dir, &framework, &sdks, &output),
            )
            .await?;

            info!(framework = %framework, path = %output.display(), "Built xcframework");
            built.push(output);
        }

        Ok(built)
    }
}
