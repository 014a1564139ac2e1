// ABOUTME: Structured descriptor documents (key-value trees).
// ABOUTME: The deploy descriptor carries the image tag at a fixed path.

use serde::Serialize;
use serde_json::Value;

use super::ConfigError;
use crate::types::{ImageTag, WorkloadName};

/// Canonical location of the image to build and deploy.
pub const IMAGE_POINTER: &str = "/spec/template/spec/containers/0/image";

/// Location of the workload name.
pub const NAME_POINTER: &str = "/metadata/name";

/// A parsed descriptor. The wrapped value is always an object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Descriptor(Value);

impl Descriptor {
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            object @ Value::Object(_) => Ok(Self(object)),
            Value::Null => Err(ConfigError::malformed("descriptor is empty")),
            other => Err(ConfigError::malformed(format!(
                "descriptor must be a mapping, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Parse YAML (and therefore JSON) text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| ConfigError::malformed(format!("invalid YAML: {e}")))?;
        Self::from_value(value)
    }

    /// Look up a value by RFC 6901 JSON pointer, e.g. `/metadata/name`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(Value::as_str)
    }

    /// A copy of the document with `apiVersion`/`kind` filled in when missing.
    pub fn with_type_defaults(&self, api_version: &str, kind: &str) -> Value {
        let mut value = self.0.clone();
        if let Value::Object(map) = &mut value {
            map.entry("apiVersion")
                .or_insert_with(|| Value::String(api_version.to_string()));
            map.entry("kind")
                .or_insert_with(|| Value::String(kind.to_string()));
        }
        value
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// A workload descriptor whose image tag has been read and checked.
///
/// The document cannot be modified after construction, so the tag built and
/// the tag deployed always come from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployDescriptor {
    document: Descriptor,
    image: ImageTag,
}

impl DeployDescriptor {
    pub fn new(document: Descriptor) -> Result<Self, ConfigError> {
        let raw = document.str_at(IMAGE_POINTER).ok_or_else(|| {
            ConfigError::malformed("deploy config has no image at spec.template.spec.containers[0].image")
        })?;
        let image = ImageTag::new(raw)
            .map_err(|e| ConfigError::malformed(format!("deploy config image: {e}")))?;
        Ok(Self { document, image })
    }

    pub fn image(&self) -> &ImageTag {
        &self.image
    }

    /// The workload name from `metadata.name`.
    pub fn name(&self) -> Result<WorkloadName, ConfigError> {
        let raw = self
            .document
            .str_at(NAME_POINTER)
            .ok_or_else(|| ConfigError::malformed("deploy config has no metadata.name"))?;
        WorkloadName::new(raw)
            .map_err(|e| ConfigError::malformed(format!("deploy config metadata.name: {e}")))
    }

    pub fn document(&self) -> &Descriptor {
        &self.document
    }
}

/// The network-facing counterpart of a workload.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    document: Descriptor,
}

impl ServiceDescriptor {
    pub fn new(document: Descriptor) -> Self {
        Self { document }
    }

    pub fn name(&self) -> Option<&str> {
        self.document.str_at(NAME_POINTER)
    }

    pub fn document(&self) -> &Descriptor {
        &self.document
    }
}
