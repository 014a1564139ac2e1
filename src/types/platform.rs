// ABOUTME: OS/architecture pairs in the registry naming convention.
// ABOUTME: Maps the build host's Rust target names onto registry platform strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("invalid platform string '{0}' (expected os/arch)")]
    Invalid(String),

    #[error("host architecture '{0}' has no registry platform mapping")]
    UnmappedArch(String),

    #[error("host operating system '{0}' has no registry platform mapping")]
    UnmappedOs(String),
}

/// Rust `target_arch` names and their registry equivalents.
const ARCH_MAPPINGS: &[(&str, &str)] = &[
    ("x86_64", "amd64"),
    ("x86", "386"),
    ("aarch64", "arm64"),
    ("arm", "arm"),
    ("s390x", "s390x"),
    ("riscv64", "riscv64"),
    ("powerpc64", "ppc64le"),
];

const OS_MAPPINGS: &[(&str, &str)] = &[
    ("linux", "linux"),
    ("windows", "windows"),
    ("macos", "darwin"),
];

/// A platform such as `linux/amd64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_lowercase(),
            arch: arch.to_lowercase(),
        }
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// The platform of the machine running this process.
    pub fn host() -> Result<Self, PlatformError> {
        Self::from_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Translate Rust target names into the registry convention.
    pub fn from_target(os: &str, arch: &str) -> Result<Self, PlatformError> {
        let os = lookup(OS_MAPPINGS, os).ok_or_else(|| PlatformError::UnmappedOs(os.to_string()))?;
        let arch =
            lookup(ARCH_MAPPINGS, arch).ok_or_else(|| PlatformError::UnmappedArch(arch.to_string()))?;
        Ok(Self::new(os, arch))
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| *to)
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((os, arch)) if !os.is_empty() && !arch.is_empty() && !arch.contains('/') => {
                Ok(Self::new(os, arch))
            }
            // os/arch/variant: the variant is not part of the comparison
            Some((os, rest)) if !os.is_empty() => match rest.split_once('/') {
                Some((arch, _variant)) if !arch.is_empty() => Ok(Self::new(os, arch)),
                _ => Err(PlatformError::Invalid(s.to_string())),
            },
            _ => Err(PlatformError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = PlatformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
