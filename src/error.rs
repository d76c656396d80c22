//! Error types for Carton
//!
//! All modules use `CartonResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Carton operations
pub type CartonResult<T> = Result<T, CartonError>;

/// All errors that can occur in Carton
#[derive(Error, Debug)]
pub enum CartonError {
    // Post-resolution invariants
    #[error("The Package.resolved lockfile was not found at {path} after resolving the dependencies using the Swift Package Manager")]
    LockfileMissing { path: PathBuf },

    #[error("The .build directory was not found at {path} after resolving the dependencies using the Swift Package Manager")]
    BuildDirectoryMissing { path: PathBuf },

    // Manifest errors
    #[error("Dependencies manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Invalid dependencies manifest at {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Resolver output errors
    #[error("Unexpected output from {command}: {reason}")]
    ResolverOutput { command: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, output: {output}")]
    CommandExecution { command: String, output: String },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl CartonError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            output: output.into(),
        }
    }

    /// Whether the error points at a bug rather than a problem with the user's setup.
    ///
    /// The resolver reported success but did not leave its artifacts behind.
    pub fn is_bug(&self) -> bool {
        matches!(
            self,
            Self::LockfileMissing { .. } | Self::BuildDirectoryMissing { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        if self.is_bug() {
            return Some("This is likely a bug, please report it with the output of: carton -vv fetch");
        }
        match self {
            Self::ManifestNotFound(_) => {
                Some("Create a Dependencies.toml listing your Swift packages")
            }
            Self::CommandFailed { .. } => Some("Make sure Xcode command line tools are installed"),
            _ => None,
        }
    }
}
