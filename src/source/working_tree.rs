// ABOUTME: Ephemeral directory owned by exactly one pipeline run.
// ABOUTME: Removed on close() or on drop, whichever comes first.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const WORKDIR_PREFIX: &str = "kaas-repo-build-";

/// A uniquely named temporary directory holding one checkout.
///
/// Not `Clone`: a tree belongs to a single run. Dropping it removes the
/// directory, so early returns and panics clean up too.
#[derive(Debug)]
pub struct WorkingTree {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl WorkingTree {
    /// Create a fresh directory under `parent` (system temp dir when `None`).
    pub fn create(parent: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKDIR_PREFIX);
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        let path = dir.path().to_path_buf();
        tracing::debug!("created working tree {}", path.display());
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now and report failure.
    pub fn close(mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => {
                dir.close()?;
                tracing::debug!("removed working tree {}", self.path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for WorkingTree {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!("removed working tree {}", self.path.display()),
                Err(e) => tracing::warn!(
                    "failed to remove working tree {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_directory() {
        let parent = tempfile::tempdir().unwrap();
        let tree = WorkingTree::create(Some(parent.path())).unwrap();
        let path = tree.path().to_path_buf();
        std::fs::write(path.join("Dockerfile"), "FROM alpine\n").unwrap();
        assert!(path.exists());

        drop(tree);
        assert!(!path.exists());
    }

    #[test]
    fn close_removes_directory() {
        let parent = tempfile::tempdir().unwrap();
        let tree = WorkingTree::create(Some(parent.path())).unwrap();
        let path = tree.path().to_path_buf();

        tree.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn trees_are_unique() {
        let parent = tempfile::tempdir().unwrap();
        let a = WorkingTree::create(Some(parent.path())).unwrap();
        let b = WorkingTree::create(Some(parent.path())).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(
            a.path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(WORKDIR_PREFIX)
        );
    }
}
