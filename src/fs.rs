//! Filesystem operations used by the fetch pipeline
//!
//! Copies handle both files and directory trees (framework bundles carry
//! symlinks, which are recreated rather than followed). Replacement of an
//! existing path is staged next to the destination and swapped in by
//! rename so the destination is never observed half-written.

use crate::error::{CartonError, CartonResult};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Whether anything (file, directory or symlink) exists at `path`
pub async fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).await.is_ok()
}

/// Create a directory and all of its parents
pub async fn create_dir_all(path: &Path) -> CartonResult<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| CartonError::io(format!("creating directory {}", path.display()), e))
}

/// Remove a file or directory tree. A missing path is not an error.
pub async fn remove_all(path: &Path) -> CartonResult<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(CartonError::io(format!("inspecting {}", path.display()), e));
        }
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match result {
        Ok(()) => {
            debug!(path = %path.display(), "Removed");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CartonError::io(format!("removing {}", path.display()), e)),
    }
}

/// Copy a file or a directory tree to `to`. The parent of `to` must exist.
pub async fn copy(from: &Path, to: &Path) -> CartonResult<()> {
    let metadata = fs::symlink_metadata(from)
        .await
        .map_err(|e| CartonError::io(format!("inspecting {}", from.display()), e))?;

    if !metadata.is_dir() {
        return copy_entry(from, to, metadata.file_type()).await;
    }

    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(from.to_path_buf(), to.to_path_buf())];
    while let Some((src, dst)) = pending.pop() {
        fs::create_dir(&dst)
            .await
            .map_err(|e| CartonError::io(format!("creating directory {}", dst.display()), e))?;

        let mut entries = fs::read_dir(&src)
            .await
            .map_err(|e| CartonError::io(format!("reading directory {}", src.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CartonError::io(format!("reading directory {}", src.display()), e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| CartonError::io(format!("inspecting {}", entry.path().display()), e))?;
            let target = dst.join(entry.file_name());

            if file_type.is_dir() {
                pending.push((entry.path(), target));
            } else {
                copy_entry(&entry.path(), &target, file_type).await?;
            }
        }
    }

    debug!(from = %from.display(), to = %to.display(), "Copied directory");
    Ok(())
}

async fn copy_entry(from: &Path, to: &Path, file_type: std::fs::FileType) -> CartonResult<()> {
    #[cfg(unix)]
    {
        if file_type.is_symlink() {
            let target = fs::read_link(from)
                .await
                .map_err(|e| CartonError::io(format!("reading link {}", from.display()), e))?;
            return fs::symlink(&target, to)
                .await
                .map_err(|e| CartonError::io(format!("creating link {}", to.display()), e));
        }
    }
    #[cfg(not(unix))]
    let _ = file_type;

    fs::copy(from, to)
        .await
        .map(|_| ())
        .map_err(|e| {
            CartonError::io(
                format!("copying {} to {}", from.display(), to.display()),
                e,
            )
        })
}

/// Write `content` to `path` through a temporary sibling file and a rename
pub async fn write_atomic(path: &Path, content: &str) -> CartonResult<()> {
    let parent = parent_of(path)?;
    let target = path.to_path_buf();
    let content = content.to_string();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new_in(&parent)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| CartonError::io(format!("writing {}", path.display()), io::Error::other(e)))?
    .map_err(|e| CartonError::io(format!("writing {}", path.display()), e))
}

/// Replace the existing path `to` with a copy of `from`
///
/// The copy is staged in a temporary directory next to `to` and renamed
/// over it. `to` may be a file, a directory or a symlink; its kind does not
/// have to match `from`.
pub async fn replace(to: &Path, from: &Path) -> CartonResult<()> {
    let parent = parent_of(to)?;
    let staging = tempfile::Builder::new()
        .prefix(".carton-replace-")
        .tempdir_in(&parent)
        .map_err(|e| {
            CartonError::io(format!("creating staging directory in {}", parent.display()), e)
        })?;

    let staged = staging.path().join("staged");
    copy(from, &staged).await?;

    // Kept outside the staging directory so a failed rollback never deletes it
    let mut previous = staging.path().as_os_str().to_os_string();
    previous.push(".previous");
    let previous = PathBuf::from(previous);

    swap_in(&staged, to, &previous).await?;
    remove_all(&previous).await?;

    let staging_path = staging.path().to_path_buf();
    staging
        .close()
        .map_err(|e| CartonError::io(format!("removing {}", staging_path.display()), e))?;

    debug!(from = %from.display(), to = %to.display(), "Replaced");
    Ok(())
}

/// Rename `staged` to `to`.
///
/// A file over a file is a single rename. Otherwise the current `to` is
/// moved to `previous` first and moved back if the final rename fails.
async fn swap_in(staged: &Path, to: &Path, previous: &Path) -> CartonResult<()> {
    let staged_is_dir = fs::symlink_metadata(staged)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    let to_is_dir = match fs::symlink_metadata(to).await {
        Ok(m) => Some(m.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(CartonError::io(format!("inspecting {}", to.display()), e)),
    };

    let move_aside = match to_is_dir {
        Some(is_dir) => is_dir || staged_is_dir,
        None => false,
    };
    if move_aside {
        fs::rename(to, previous)
            .await
            .map_err(|e| CartonError::io(format!("moving aside {}", to.display()), e))?;
    }

    if let Err(e) = fs::rename(staged, to).await {
        if move_aside {
            if let Err(restore) = fs::rename(previous, to).await {
                warn!(
                    path = %to.display(),
                    previous = %previous.display(),
                    error = %restore,
                    "Failed to restore previous content"
                );
            }
        }
        return Err(CartonError::io(
            format!("renaming {} to {}", staged.display(), to.display()),
            e,
        ));
    }

    Ok(())
}

/// Copy `from` to `to`, replacing `to` if it exists or creating its parents if not
pub async fn place(from: &Path, to: &Path) -> CartonResult<()> {
    if exists(to).await {
        replace(to, from).await
    } else {
        create_dir_all(&parent_of(to)?).await?;
        copy(from, to).await
    }
}

fn parent_of(path: &Path) -> CartonResult<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| CartonError::User(format!("{} has no parent directory", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn remove_all_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        remove_all(&dir.path().join("nope")).await.unwrap();
    }

    #[tokio::test]
    async fn remove_all_file_and_tree() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        let tree = dir.path().join("tree");
        write(&file, "a").await;
        write(&tree.join("x/y.txt"), "y").await;

        remove_all(&file).await.unwrap();
        remove_all(&tree).await.unwrap();

        assert!(!exists(&file).await);
        assert!(!exists(&tree).await);
    }

    #[tokio::test]
    async fn copy_directory_tree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        write(&src.join("a.txt"), "a").await;
        write(&src.join("nested/b.txt"), "b").await;

        let dst = dir.path().join("dst");
        copy(&src, &dst).await.unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).await.unwrap(), "a");
        assert_eq!(
            fs::read_to_string(dst.join("nested/b.txt")).await.unwrap(),
            "b"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_preserves_symlinks() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("Alpha.framework");
        write(&src.join("Versions/A/Alpha"), "bin").await;
        fs::symlink("A", src.join("Versions/Current")).await.unwrap();

        let dst = dir.path().join("copy.framework");
        copy(&src, &dst).await.unwrap();

        let link = fs::read_link(dst.join("Versions/Current")).await.unwrap();
        assert_eq!(link, PathBuf::from("A"));
    }

    #[tokio::test]
    async fn write_atomic_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Package.swift");

        write_atomic(&path, "first").await.unwrap();
        write_atomic(&path, "second").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn replace_directory_drops_stale_entries() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("new");
        let to = dir.path().join("old");
        write(&from.join("fresh.txt"), "fresh").await;
        write(&to.join("stale.txt"), "stale").await;

        replace(&to, &from).await.unwrap();

        assert!(exists(&to.join("fresh.txt")).await);
        assert!(!exists(&to.join("stale.txt")).await);
        // source untouched, no staging left behind
        assert!(exists(&from.join("fresh.txt")).await);
        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert!(!entry
                .file_name()
                .to_string_lossy()
                .starts_with(".carton-replace-"));
        }
    }

    #[tokio::test]
    async fn replace_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("new.resolved");
        let to = dir.path().join("Package.resolved");
        write(&from, "v2").await;
        write(&to, "v1").await;

        replace(&to, &from).await.unwrap();

        assert_eq!(fs::read_to_string(&to).await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn place_creates_parents() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("Package.resolved");
        write(&from, "pins").await;
        let to = dir.path().join("Deps/Lockfiles/Package.resolved");

        place(&from, &to).await.unwrap();

        assert_eq!(fs::read_to_string(&to).await.unwrap(), "pins");
    }

    #[tokio::test]
    async fn place_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("Alpha.xcframework");
        write(&from.join("Info.plist"), "plist").await;
        let to = dir.path().join("cache/Alpha.xcframework");

        place(&from, &to).await.unwrap();
        place(&from, &to).await.unwrap();

        assert_eq!(
            fs::read_to_string(to.join("Info.plist")).await.unwrap(),
            "plist"
        );
        let mut entries = fs::read_dir(&to).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn place_directory_over_stale_file() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("Alpha.xcframework");
        write(&from.join("Info.plist"), "plist").await;
        let to = dir.path().join("cache/Alpha.xcframework");
        write(&to, "stale file").await;

        place(&from, &to).await.unwrap();

        assert!(fs::metadata(&to).await.unwrap().is_dir());
        assert_eq!(
            fs::read_to_string(to.join("Info.plist")).await.unwrap(),
            "plist"
        );
    }

    #[tokio::test]
    async fn place_file_over_stale_directory() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("Package.resolved");
        write(&from, "pins").await;
        let to = dir.path().join("Lockfiles/Package.resolved");
        write(&to.join("junk.txt"), "junk").await;

        place(&from, &to).await.unwrap();

        assert_eq!(fs::read_to_string(&to).await.unwrap(), "pins");
    }

    #[tokio::test]
    async fn failed_swap_restores_previous_content() {
        let dir = TempDir::new().unwrap();
        let to = dir.path().join(".build");
        write(&to.join("marker"), "old build").await;
        let previous = dir.path().join(".build.previous");

        let err = swap_in(&dir.path().join("missing"), &to, &previous)
            .await
            .unwrap_err();

        assert!(matches!(err, CartonError::Io { .. }));
        assert_eq!(
            fs::read_to_string(to.join("marker")).await.unwrap(),
            "old build"
        );
        assert!(!exists(&previous).await);
    }
}
