// ABOUTME: Process settings for kaas-build, read from kaas.yml.
// ABOUTME: Handles YAML parsing, file discovery, env interpolation, and defaults.

mod env_value;
mod server;

pub use env_value::EnvValue;
pub use server::ServerSettings;

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use crate::types::Platform;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILENAME: &str = "kaas.yml";
pub const SETTINGS_FILENAME_ALT: &str = "kaas.yaml";
pub const SETTINGS_FILENAME_DIR: &str = ".kaas/config.yml";

/// Repository-relative file read when a request names no deploy descriptor.
pub const DEFAULT_DEPLOY_FILE: &str = "kaas.deploy.yml";
/// Repository-relative file read when a request names no service descriptor.
pub const DEFAULT_SERVICE_FILE: &str = "kaas.service.yml";

const DEFAULT_REGISTRY: &str = "localhost:5000";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Registry that built images are pushed to. `null` pushes tags as they are.
    #[serde(default = "default_registry")]
    pub registry: Option<EnvValue>,

    #[serde(default = "default_push")]
    pub push: bool,

    #[serde(default = "default_deploy_file")]
    pub deploy_file: String,

    #[serde(default = "default_service_file")]
    pub service_file: String,

    /// Parent directory for working trees. Defaults to the system temp dir.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Overrides host platform detection, e.g. `linux/amd64`.
    #[serde(default)]
    pub platform: Option<Platform>,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub cluster: ClusterSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSettings {
    /// kubeconfig context; the current context is used when absent.
    #[serde(default)]
    pub context: Option<String>,
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_registry() -> Option<EnvValue> {
    Some(EnvValue::Literal(DEFAULT_REGISTRY.to_string()))
}

fn default_push() -> bool {
    true
}

fn default_deploy_file() -> String {
    DEFAULT_DEPLOY_FILE.to_string()
}

fn default_service_file() -> String {
    DEFAULT_SERVICE_FILE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            namespace: default_namespace(),
            registry: default_registry(),
            push: default_push(),
            deploy_file: default_deploy_file(),
            service_file: default_service_file(),
            work_dir: None,
            platform: None,
            runtime: RuntimeConfig::default(),
            cluster: ClusterSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid "all defaults" document.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::SettingsNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::from_yaml(&content)
    }

    /// Load the first settings file found in `dir`, or defaults when none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(SETTINGS_FILENAME),
            dir.join(SETTINGS_FILENAME_ALT),
            dir.join(SETTINGS_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading settings from {}", path.display());
                return Self::load(path);
            }
        }

        tracing::debug!("no settings file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// The registry endpoint with env references resolved.
    pub fn registry(&self) -> Result<Option<String>> {
        self.registry
            .as_ref()
            .map(|value| value.resolve("registry"))
            .transpose()
            .map(|r| r.filter(|s| !s.trim().is_empty()))
    }

}
