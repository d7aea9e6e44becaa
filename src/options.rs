//! Generator options.
//!
//! Options are an explicit value threaded through resolution and preparation.
//! They can be loaded from a YAML file whose sections mirror the structs below:
//!
//! ```yaml
//! naming:
//!   enum_case: PascalCase
//!   function_case: snake_case
//!   enum_value_case: UPPER_CASE
//!   omit_prefix: true
//! targets:
//!   apis: [gl, gles2]
//!   versions: ["3.3", "3.0"]
//!   intersect_features: true
//!   profile: core
//! output:
//!   path: gl.json
//!   format: json
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::feature::{Feature, FeatureApi, FeatureVersion, Profile};

/// Supported identifier casings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    /// Keep the identifier as found
    #[serde(rename = "initial")]
    Initial,
    #[default]
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "UPPER_CASE")]
    UpperCase,
}

impl Case {
    pub const ALL: [Case; 5] = [
        Case::Initial,
        Case::SnakeCase,
        Case::CamelCase,
        Case::PascalCase,
        Case::UpperCase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Case::Initial => "initial",
            Case::SnakeCase => "snake_case",
            Case::CamelCase => "camelCase",
            Case::PascalCase => "PascalCase",
            Case::UpperCase => "UPPER_CASE",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown case '{value}' (expected one of: initial, snake_case, camelCase, PascalCase, UPPER_CASE)")]
pub struct ParseCaseError {
    pub value: String,
}

impl FromStr for Case {
    type Err = ParseCaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Case::Initial),
            "snake_case" => Ok(Case::SnakeCase),
            "camelCase" => Ok(Case::CamelCase),
            "PascalCase" => Ok(Case::PascalCase),
            "UPPER_CASE" => Ok(Case::UpperCase),
            _ => Err(ParseCaseError {
                value: s.to_string(),
            }),
        }
    }
}

/// Format the prepared IR is written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A single pretty-printed JSON document
    #[default]
    Json,
    /// One JSON record per line
    Ndjson,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Ndjson => "ndjson",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format '{value}' (expected one of: json, ndjson)")]
pub struct ParseFormatError {
    pub value: String,
}

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "ndjson" => Ok(OutputFormat::Ndjson),
            _ => Err(ParseFormatError {
                value: s.to_string(),
            }),
        }
    }
}

fn default_namespace() -> String {
    "gl".to_string()
}

/// Naming style of generated identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingOptions {
    #[serde(default)]
    pub enum_case: Case,
    #[serde(default)]
    pub function_case: Case,
    #[serde(default)]
    pub enum_value_case: Case,
    /// Strip `gl` and `GL_` prefixes
    #[serde(default)]
    pub omit_prefix: bool,
    #[serde(default = "default_namespace")]
    pub enum_namespace: String,
    #[serde(default = "default_namespace")]
    pub command_namespace: String,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            enum_case: Case::default(),
            function_case: Case::default(),
            enum_value_case: Case::default(),
            omit_prefix: false,
            enum_namespace: default_namespace(),
            command_namespace: default_namespace(),
        }
    }
}

/// Requested feature levels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetOptions {
    #[serde(default)]
    pub apis: Vec<FeatureApi>,
    #[serde(default)]
    pub versions: Vec<FeatureVersion>,
    /// Collect the least common denominator of all targets
    #[serde(default)]
    pub intersect_features: bool,
    #[serde(default)]
    pub profile: Profile,
}

impl TargetOptions {
    /// Pair every requested API with its version
    pub fn features(&self) -> Vec<Feature> {
        self.apis
            .iter()
            .zip(&self.versions)
            .map(|(api, version)| Feature::new(*api, *version))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputOptions {
    /// File to write to; stdout when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Top-level options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorOptions {
    #[serde(default)]
    pub naming: NamingOptions,
    #[serde(default)]
    pub targets: TargetOptions,
    #[serde(default)]
    pub output: OutputOptions,
}

/// Errors raised while loading or validating options
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("must specify at least one API and version")]
    NoTargets,
    #[error("must specify a version for every API ({apis} APIs, {versions} versions)")]
    TargetCountMismatch { apis: usize, versions: usize },
    #[error("{0} targets requested; multiple targets require intersect_features")]
    MultipleTargetsWithoutIntersection(usize),
    #[error("API '{0}' requested more than once; request one version per API")]
    DuplicateApi(FeatureApi),
}

impl GeneratorOptions {
    /// Load options from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, OptionsError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Check the target preconditions
    ///
    /// Every API needs a version, each API may be requested once, and more
    /// than one target is only allowed when intersecting.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let targets = &self.targets;
        if targets.apis.len() != targets.versions.len() {
            return Err(OptionsError::TargetCountMismatch {
                apis: targets.apis.len(),
                versions: targets.versions.len(),
            });
        }
        if targets.apis.is_empty() {
            return Err(OptionsError::NoTargets);
        }
        if let Some(api) = targets
            .apis
            .iter()
            .enumerate()
            .find_map(|(i, api)| targets.apis[..i].contains(api).then_some(*api))
        {
            return Err(OptionsError::DuplicateApi(api));
        }
        if targets.apis.len() > 1 && !targets.intersect_features {
            return Err(OptionsError::MultipleTargetsWithoutIntersection(
                targets.apis.len(),
            ));
        }
        Ok(())
    }
}
