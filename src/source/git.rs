// ABOUTME: Version-control client used by checkout.
// ABOUTME: GitCli shells out to git with prompts disabled.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("unable to clone repo {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("unable to checkout branch '{reference}': {message}")]
    RefNotFound { reference: String, message: String },

    #[error("unable to create working tree: {0}")]
    Workdir(#[source] std::io::Error),
}

/// Clone and checkout operations.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Clone `url` into the existing, empty directory `dest`.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), SourceError>;

    /// Check out a branch or tag inside a cloned repository.
    async fn checkout(&self, repo: &Path, reference: &str) -> Result<(), SourceError>;
}

/// The `git` command-line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

struct GitOutput {
    success: bool,
    stderr: String,
}

impl GitCli {
    async fn run(&self, args: &[&OsStr]) -> std::io::Result<GitOutput> {
        let output = Command::new(&self.program)
            .args(args)
            // never block waiting for credentials
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(GitOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[async_trait]
impl SourceControl for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), SourceError> {
        let unreachable = |message: String| SourceError::Unreachable {
            url: url.to_string(),
            message,
        };

        let output = self
            .run(&[
                OsStr::new("clone"),
                OsStr::new("--quiet"),
                OsStr::new("--"),
                OsStr::new(url),
                dest.as_os_str(),
            ])
            .await
            .map_err(|e| unreachable(format!("failed to run git: {e}")))?;

        if !output.success {
            return Err(unreachable(output.stderr));
        }
        Ok(())
    }

    async fn checkout(&self, repo: &Path, reference: &str) -> Result<(), SourceError> {
        let not_found = |message: String| SourceError::RefNotFound {
            reference: reference.to_string(),
            message,
        };

        if reference.starts_with('-') {
            return Err(not_found("references cannot start with '-'".to_string()));
        }

        let output = self
            .run(&[
                OsStr::new("-C"),
                repo.as_os_str(),
                OsStr::new("checkout"),
                OsStr::new("--quiet"),
                OsStr::new(reference),
                OsStr::new("--"),
            ])
            .await
            .map_err(|e| not_found(format!("failed to run git: {e}")))?;

        if !output.success {
            return Err(not_found(output.stderr));
        }
        Ok(())
    }
}
