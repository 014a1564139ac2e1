// ABOUTME: Pipeline state types for the type state pattern.
// ABOUTME: Each state carries the data produced by the stages before it.

use crate::arch::BasePlatformInfo;
use crate::build::BuiltImage;
use crate::descriptor::{DeployDescriptor, ServiceDescriptor};

/// Repository checked out into the run's working tree.
/// Available actions: `configure()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Cloned;

/// Descriptors resolved.
/// Available actions: `check_arch()`, `restart()`
#[derive(Debug, Clone)]
pub struct Configured {
    pub(crate) deploy: DeployDescriptor,
    pub(crate) service: Option<ServiceDescriptor>,
}

/// Base image known to run on the build host.
/// Available actions: `build()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) deploy: DeployDescriptor,
    pub(crate) service: Option<ServiceDescriptor>,
    pub(crate) base: BasePlatformInfo,
}

/// Image built (and pushed, when enabled).
/// Available actions: `deploy()`
#[derive(Debug, Clone)]
pub struct Built {
    pub(crate) deploy: DeployDescriptor,
    pub(crate) service: Option<ServiceDescriptor>,
    pub(crate) image: BuiltImage,
}
