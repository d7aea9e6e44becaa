//! Feature levels, targets and requirement sets.
//!
//! A feature level is a named (API family, version) milestone of the registry.
//! This module defines the identity types used to request a target and the
//! [`Requirements`] a target resolves to.

pub mod extension;
pub mod requirements;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use extension::{extension_requirements, supported_extensions, Extension};
pub use requirements::{
    feature_requirements, is_compatible, merge_requirements, resolve_requirements,
};

/// API family a feature level belongs to.
///
/// Families never inherit from each other, not even closely related ones such
/// as `gles1` and `gles2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureApi {
    /// Desktop OpenGL
    Gl,
    /// OpenGL ES 1.x
    Gles1,
    /// OpenGL ES 2.0 and later
    Gles2,
    /// OpenGL SC 2.0
    Glsc2,
    /// Identity of requirements merged from several targets. Never parsed.
    #[serde(skip_deserializing)]
    Merged,
}

impl FeatureApi {
    /// Every family that may appear in a registry or be requested as a target.
    pub const REGISTRY_APIS: [FeatureApi; 4] = [
        FeatureApi::Gl,
        FeatureApi::Gles1,
        FeatureApi::Gles2,
        FeatureApi::Glsc2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureApi::Gl => "gl",
            FeatureApi::Gles1 => "gles1",
            FeatureApi::Gles2 => "gles2",
            FeatureApi::Glsc2 => "glsc2",
            FeatureApi::Merged => "merged",
        }
    }
}

impl fmt::Display for FeatureApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known API family
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown API '{value}' (expected one of: gl, gles1, gles2, glsc2)")]
pub struct ParseApiError {
    pub value: String,
}

impl FromStr for FeatureApi {
    type Err = ParseApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gl" => Ok(FeatureApi::Gl),
            "gles1" => Ok(FeatureApi::Gles1),
            "gles2" => Ok(FeatureApi::Gles2),
            "glsc2" => Ok(FeatureApi::Glsc2),
            _ => Err(ParseApiError {
                value: s.to_string(),
            }),
        }
    }
}

/// Version of a feature level, ordered by major then minor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureVersion {
    pub major: u32,
    pub minor: u32,
}

impl FeatureVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for FeatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error returned for malformed `<major>.<minor>` strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseVersionError {
    #[error("version '{0}' must specify both major and minor components")]
    MissingComponent(String),
    #[error("major component of version '{0}' is not a number")]
    InvalidMajor(String),
    #[error("minor component of version '{0}' is not a number")]
    InvalidMinor(String),
}

impl FromStr for FeatureVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| ParseVersionError::MissingComponent(s.to_string()))?;
        if minor.contains('.') {
            return Err(ParseVersionError::MissingComponent(s.to_string()));
        }
        let major = major
            .parse()
            .map_err(|_| ParseVersionError::InvalidMajor(s.to_string()))?;
        let minor = minor
            .parse()
            .map_err(|_| ParseVersionError::InvalidMinor(s.to_string()))?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for FeatureVersion {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeatureVersion> for String {
    fn from(version: FeatureVersion) -> Self {
        version.to_string()
    }
}

/// GL profile a target is resolved for.
///
/// Registry `<require>` and `<remove>` blocks tagged with a profile only apply
/// to targets of that profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Core,
    Compatibility,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Core => "core",
            Profile::Compatibility => "compatibility",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profile '{value}' (expected one of: core, compatibility)")]
pub struct ParseProfileError {
    pub value: String,
}

impl FromStr for Profile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(Profile::Core),
            "compatibility" => Ok(Profile::Compatibility),
            _ => Err(ParseProfileError {
                value: s.to_string(),
            }),
        }
    }
}

/// A feature level identity: API family plus version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Feature {
    pub api: FeatureApi,
    pub version: FeatureVersion,
}

impl Feature {
    pub const fn new(api: FeatureApi, version: FeatureVersion) -> Self {
        Self { api, version }
    }

    /// Sentinel identity carried by requirements merged from several targets
    pub const fn merged() -> Self {
        Self {
            api: FeatureApi::Merged,
            version: FeatureVersion::new(0, 0),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.api, self.version)
    }
}

/// Entities a target requires, each mapped to the version that first
/// introduced it. Keys keep the order in which the registry declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub enums: IndexMap<String, FeatureVersion>,
    pub commands: IndexMap<String, FeatureVersion>,
    /// Set when this instance is the intersection of several targets
    pub is_merged: bool,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.commands.is_empty()
    }

    /// Add every entity of `other` that is not yet recorded here
    pub fn extend_from(&mut self, other: &Requirements) {
        for (name, version) in &other.enums {
            self.enums.entry(name.clone()).or_insert(*version);
        }
        for (name, version) in &other.commands {
            self.commands.entry(name.clone()).or_insert(*version);
        }
    }
}

/// Errors raised while resolving requirements for a target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("unknown feature '{requested}', available features: {}", format_features(.available))]
    UnknownFeature {
        requested: Feature,
        available: Vec<Feature>,
    },
    #[error("no target features requested")]
    NoTargets,
}

fn format_features(features: &[Feature]) -> String {
    if features.is_empty() {
        return "none".to_string();
    }
    features
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
