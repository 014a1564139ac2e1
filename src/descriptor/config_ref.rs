// ABOUTME: How a request names a descriptor: default file, repo path, or inline.
// ABOUTME: Validates caller-supplied shapes before any pipeline stage runs.

use serde_json::Value;
use std::path::{Component, Path, PathBuf};

use super::{ConfigError, Descriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigRef {
    /// Read the default filename from the repository root.
    Default,
    /// Read a repository-relative file.
    Path(PathBuf),
    /// Use a document supplied by the caller.
    Inline(Descriptor),
}

impl ConfigRef {
    /// A repository-relative path. Absolute paths and `..` are refused.
    pub fn path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::malformed("config path is empty"));
        }
        if !is_repo_relative(path) {
            return Err(ConfigError::malformed(format!(
                "config path must stay inside the repository: {}",
                path.display()
            )));
        }
        Ok(ConfigRef::Path(path.to_path_buf()))
    }

    /// Interpret a request field.
    ///
    /// Absent or null selects the default file. An object is an inline document.
    /// A string starting with `{` is a serialized inline document; any other
    /// string is a path. Other JSON types are ambiguous and rejected.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ConfigError> {
        match value {
            None | Some(Value::Null) => Ok(ConfigRef::Default),
            Some(object @ Value::Object(_)) => {
                Descriptor::from_value(object.clone()).map(ConfigRef::Inline)
            }
            Some(Value::String(s)) if s.trim_start().starts_with('{') => {
                Descriptor::from_yaml(s).map(ConfigRef::Inline)
            }
            Some(Value::String(s)) => ConfigRef::path(s.trim()),
            Some(other) => Err(ConfigError::malformed(format!(
                "config must be a path or a document, got {other}"
            ))),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigRef::Default)
    }
}

pub(crate) fn is_repo_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_absent_select_default() {
        assert_eq!(ConfigRef::from_json(None).unwrap(), ConfigRef::Default);
        assert_eq!(
            ConfigRef::from_json(Some(&Value::Null)).unwrap(),
            ConfigRef::Default
        );
    }

    #[test]
    fn plain_string_is_a_path() {
        let r = ConfigRef::from_json(Some(&json!("deploy/app.yml"))).unwrap();
        assert_eq!(r, ConfigRef::Path(PathBuf::from("deploy/app.yml")));
    }

    #[test]
    fn serialized_document_is_inline() {
        let r = ConfigRef::from_json(Some(&json!(r#"{"kind": "Deployment"}"#))).unwrap();
        assert!(matches!(r, ConfigRef::Inline(_)));
    }

    #[test]
    fn broken_serialized_document_is_malformed() {
        let err = ConfigRef::from_json(Some(&json!("{kind: [unclosed"))).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn numbers_are_ambiguous() {
        assert!(ConfigRef::from_json(Some(&json!(42))).is_err());
        assert!(ConfigRef::from_json(Some(&json!(["a"]))).is_err());
    }

    #[test]
    fn escaping_paths_are_refused() {
        assert!(ConfigRef::path("../secrets.yml").is_err());
        assert!(ConfigRef::path("/etc/passwd").is_err());
        assert!(ConfigRef::path("a/../../b").is_err());
        assert!(ConfigRef::path("./kaas.deploy.yml").is_ok());
    }
}
