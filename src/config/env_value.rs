// ABOUTME: Settings strings that may come from the environment.
// ABOUTME: Written literally or as {env: NAME, default: ...}; blank variables count as unset.

use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Resolve the value of settings key `key`.
    pub fn resolve(&self, key: &'static str) -> Result<String> {
        let (var, default) = match self {
            EnvValue::Literal(s) => return Ok(s.clone()),
            EnvValue::FromEnv { var, default } => (var, default),
        };

        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => default.clone().ok_or_else(|| Error::MissingEnvVar {
                key,
                var: var.clone(),
            }),
        }
    }
}
