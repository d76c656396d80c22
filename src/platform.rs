//! Apple target platforms

use crate::error::CartonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A platform a framework can be built for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Macos,
    Tvos,
    Watchos,
}

impl Platform {
    /// All platforms, in declaration order
    pub fn all() -> &'static [Self] {
        &[Self::Ios, Self::Macos, Self::Tvos, Self::Watchos]
    }

    /// SDKs xcodebuild must archive to cover this platform (device first)
    pub fn sdks(&self) -> &'static [&'static str] {
        match self {
            Self::Ios => &["iphoneos", "iphonesimulator"],
            Self::Macos => &["macosx"],
            Self::Tvos => &["appletvos", "appletvsimulator"],
            Self::Watchos => &["watchos", "watchsimulator"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ios => "iOS",
            Self::Macos => "macOS",
            Self::Tvos => "tvOS",
            Self::Watchos => "watchOS",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Platform {
    type Err = CartonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "macos" | "osx" => Ok(Self::Macos),
            "tvos" => Ok(Self::Tvos),
            "watchos" => Ok(Self::Watchos),
            _ => Err(CartonError::UnknownPlatform(s.to_string())),
        }
    }
}
