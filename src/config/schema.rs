//! Configuration schema for Carton
//!
//! Configuration is stored at `~/.config/carton/config.toml`

use crate::manifest::DEFAULT_MANIFEST_FILE;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// External tool locations
    pub tools: ToolsConfig,

    /// Fetch defaults
    pub fetch: FetchConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Paths of the external tools carton drives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// `swift` binary used to resolve packages
    pub swift: PathBuf,

    /// `xcodebuild` binary used to build xcframeworks
    pub xcodebuild: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            swift: PathBuf::from("swift"),
            xcodebuild: PathBuf::from("xcodebuild"),
        }
    }
}

/// Fetch defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Platforms used when neither the CLI nor the manifest names any
    pub default_platforms: Vec<Platform>,

    /// Dependencies cache directory, relative to the project root
    pub cache_dir: PathBuf,

    /// Dependencies manifest file name at the project root
    pub manifest_file: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_platforms: vec![Platform::Ios],
            cache_dir: PathBuf::from("Tuist").join("Dependencies"),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }
}
