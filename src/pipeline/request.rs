// ABOUTME: Validated caller input for the create, restart, and remove pipelines.
// ABOUTME: Rejects malformed input before any external call is attempted.

use serde_json::{Map, Value};

use crate::descriptor::{ConfigError, ConfigRef};
use crate::types::{WorkloadName, WorkloadNameError};

/// Branch used when a request does not mention one.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid workload name: {0}")]
    InvalidName(#[from] WorkloadNameError),

    #[error("invalid {field}: {source}")]
    InvalidConfig {
        field: &'static str,
        #[source]
        source: ConfigError,
    },
}

/// Source location shared by create and restart requests.
#[derive(Debug, Clone, PartialEq)]
struct SourceFields {
    repo_url: String,
    branch: Option<String>,
}

impl SourceFields {
    fn from_map(body: &Map<String, Value>) -> Result<Self, RequestError> {
        let repo_url = match body.get("repo_url") {
            None | Some(Value::Null) => return Err(RequestError::MissingField("repo_url")),
            Some(Value::String(url)) if url.trim().is_empty() => {
                return Err(RequestError::MissingField("repo_url"));
            }
            Some(Value::String(url)) => url.trim().to_string(),
            Some(_) => {
                return Err(RequestError::WrongType {
                    field: "repo_url",
                    expected: "a string",
                });
            }
        };

        // Absent means the default branch name; explicit null means whatever
        // the repository's HEAD points at.
        let branch = match body.get("repo_branch") {
            None => Some(DEFAULT_BRANCH.to_string()),
            Some(Value::Null) => None,
            Some(Value::String(b)) if b.trim().is_empty() => {
                return Err(RequestError::WrongType {
                    field: "repo_branch",
                    expected: "a non-empty string or null",
                });
            }
            Some(Value::String(b)) => Some(b.trim().to_string()),
            Some(_) => {
                return Err(RequestError::WrongType {
                    field: "repo_branch",
                    expected: "a string or null",
                });
            }
        };

        Ok(Self { repo_url, branch })
    }
}

fn object(body: &Value) -> Result<&Map<String, Value>, RequestError> {
    body.as_object().ok_or(RequestError::NotAnObject)
}

fn config_field(body: &Map<String, Value>, field: &'static str) -> Result<ConfigRef, RequestError> {
    ConfigRef::from_json(body.get(field))
        .map_err(|source| RequestError::InvalidConfig { field, source })
}

/// Parse a config reference given on the command line.
///
/// A value starting with `{` is an inline document, anything else a path.
pub fn config_arg(field: &'static str, value: Option<&str>) -> Result<ConfigRef, RequestError> {
    let value = value.map(|v| Value::String(v.to_string()));
    ConfigRef::from_json(value.as_ref())
        .map_err(|source| RequestError::InvalidConfig { field, source })
}

/// Build, push, and deploy a new workload.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub repo_url: String,
    pub branch: Option<String>,
    pub deploy_config: ConfigRef,
    pub service_config: ConfigRef,
}

impl CreateRequest {
    pub fn new(repo_url: impl Into<String>, branch: Option<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch,
            deploy_config: ConfigRef::Default,
            service_config: ConfigRef::Default,
        }
    }

    pub fn with_deploy_config(mut self, config: ConfigRef) -> Self {
        self.deploy_config = config;
        self
    }

    pub fn with_service_config(mut self, config: ConfigRef) -> Self {
        self.service_config = config;
        self
    }

    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let body = object(body)?;
        let source = SourceFields::from_map(body)?;
        Ok(Self {
            repo_url: source.repo_url,
            branch: source.branch,
            deploy_config: config_field(body, "deploy_config")?,
            service_config: config_field(body, "service_config")?,
        })
    }
}

/// Re-read the deploy descriptor and patch an existing workload.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartRequest {
    pub name: WorkloadName,
    pub repo_url: String,
    pub branch: Option<String>,
    pub deploy_config: ConfigRef,
}

impl RestartRequest {
    pub fn new(name: WorkloadName, repo_url: impl Into<String>, branch: Option<String>) -> Self {
        Self {
            name,
            repo_url: repo_url.into(),
            branch,
            deploy_config: ConfigRef::Default,
        }
    }

    pub fn with_deploy_config(mut self, config: ConfigRef) -> Self {
        self.deploy_config = config;
        self
    }

    pub fn from_json(name: &str, body: &Value) -> Result<Self, RequestError> {
        let name = WorkloadName::new(name)?;
        let body = object(body)?;
        let source = SourceFields::from_map(body)?;
        Ok(Self {
            name,
            repo_url: source.repo_url,
            branch: source.branch,
            deploy_config: config_field(body, "deploy_config")?,
        })
    }
}

/// Delete a workload by name.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveRequest {
    pub name: WorkloadName,
}

impl RemoveRequest {
    pub fn new(name: &str) -> Result<Self, RequestError> {
        Ok(Self {
            name: WorkloadName::new(name)?,
        })
    }
}
