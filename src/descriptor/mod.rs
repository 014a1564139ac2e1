// ABOUTME: Deployment and service descriptors and how requests refer to them.
// ABOUTME: Resolves a ConfigRef against a working tree into a parsed document.

mod config_ref;
mod document;
mod error;
mod resolver;

pub use config_ref::ConfigRef;
pub use document::{DeployDescriptor, Descriptor, IMAGE_POINTER, NAME_POINTER, ServiceDescriptor};
pub use error::ConfigError;
pub use resolver::{resolve, resolve_optional};
