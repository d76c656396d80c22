//! Ephemeral workspace for a single fetch
//!
//! The resolver runs inside a fresh temporary directory. The guard owns the
//! directory: dropping it (on success, early return or unwinding) removes
//! the tree, `close` does the same and reports removal failures.

use crate::error::{CartonError, CartonResult};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Scoped temporary directory exclusively owned by one fetch
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a uniquely named workspace in the system temp directory
    pub fn acquire() -> CartonResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("carton-")
            .tempdir()
            .map_err(|e| CartonError::io("creating temporary workspace", e))?;
        debug!(workspace = %dir.path().display(), "Acquired workspace");
        Ok(Self { dir })
    }

    /// Create a workspace under `parent` instead of the system temp directory
    pub fn acquire_in(parent: &Path) -> CartonResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("carton-")
            .tempdir_in(parent)
            .map_err(|e| {
                CartonError::io(
                    format!("creating temporary workspace in {}", parent.display()),
                    e,
                )
            })?;
        debug!(workspace = %dir.path().display(), "Acquired workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace now, surfacing any removal error
    pub fn close(self) -> CartonResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| {
            warn!(workspace = %path.display(), error = %e, "Failed to remove workspace");
            CartonError::io(format!("removing workspace {}", path.display()), e)
        })?;
        debug!(workspace = %path.display(), "Released workspace");
        Ok(())
    }
}
