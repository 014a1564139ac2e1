// ABOUTME: Turns a ConfigRef into a Descriptor using the checked-out repository.
// ABOUTME: Only reads files; inline documents never touch the filesystem.

use std::path::Path;

use super::config_ref::is_repo_relative;
use super::{ConfigError, ConfigRef, Descriptor};

/// Resolve a descriptor that must exist.
pub async fn resolve(
    config: &ConfigRef,
    repo_root: &Path,
    default_filename: &str,
) -> Result<Descriptor, ConfigError> {
    match config {
        ConfigRef::Inline(document) => Ok(document.clone()),
        ConfigRef::Default => load_file(repo_root, Path::new(default_filename)).await,
        ConfigRef::Path(path) => load_file(repo_root, path).await,
    }
}

/// Resolve a descriptor that may be absent.
///
/// Only a missing *default* file yields `None`; a named file that is missing
/// is still an error.
pub async fn resolve_optional(
    config: &ConfigRef,
    repo_root: &Path,
    default_filename: &str,
) -> Result<Option<Descriptor>, ConfigError> {
    match resolve(config, repo_root, default_filename).await {
        Ok(document) => Ok(Some(document)),
        Err(ConfigError::NotFound(path)) if config.is_default() => {
            tracing::debug!("no {} in repository, skipping", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn load_file(repo_root: &Path, relative: &Path) -> Result<Descriptor, ConfigError> {
    if !is_repo_relative(relative) {
        return Err(ConfigError::malformed(format!(
            "config path must stay inside the repository: {}",
            relative.display()
        )));
    }

    let path = repo_root.join(relative);
    tracing::info!("reading config file from {}", path.display());

    let text = tokio::fs::read_to_string(&path).await.map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound(relative.to_path_buf()),
        _ => ConfigError::Read {
            path: relative.to_path_buf(),
            source,
        },
    })?;

    Descriptor::from_yaml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::IMAGE_POINTER;

    const DEPLOY: &str = "spec:\n  template:\n    spec:\n      containers:\n        - image: svc:1\n";

    fn repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kaas.deploy.yml"), DEPLOY).unwrap();
        std::fs::create_dir(dir.path().join("deploy")).unwrap();
        std::fs::write(dir.path().join("deploy/prod.yml"), DEPLOY).unwrap();
        dir
    }

    #[tokio::test]
    async fn default_reads_default_filename() {
        let dir = repo();
        let doc = resolve(&ConfigRef::Default, dir.path(), "kaas.deploy.yml").await.unwrap();
        assert_eq!(doc.str_at(IMAGE_POINTER), Some("svc:1"));
    }

    #[tokio::test]
    async fn path_is_relative_to_repo_root() {
        let dir = repo();
        let config = ConfigRef::path("deploy/prod.yml").unwrap();
        let doc = resolve(&config, dir.path(), "kaas.deploy.yml").await.unwrap();
        assert_eq!(doc.str_at(IMAGE_POINTER), Some("svc:1"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(&ConfigRef::Default, dir.path(), "kaas.deploy.yml").await.unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == Path::new("kaas.deploy.yml")));
    }

    #[tokio::test]
    async fn unparseable_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kaas.deploy.yml"), "spec: [unclosed\n").unwrap();
        let err = resolve(&ConfigRef::Default, dir.path(), "kaas.deploy.yml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[tokio::test]
    async fn inline_ignores_filesystem() {
        let inline = Descriptor::from_yaml(DEPLOY).unwrap();
        let doc = resolve(
            &ConfigRef::Inline(inline.clone()),
            Path::new("/nonexistent"),
            "kaas.deploy.yml",
        )
        .await
        .unwrap();
        assert_eq!(doc, inline);
    }

    #[tokio::test]
    async fn missing_default_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let doc = resolve_optional(&ConfigRef::Default, dir.path(), "kaas.service.yml").await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn missing_named_file_is_still_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigRef::path("svc.yml").unwrap();
        let err = resolve_optional(&config, dir.path(), "kaas.service.yml").await.unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
