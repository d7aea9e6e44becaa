//! # glprep: Requirement Resolution and IR Preparation for OpenGL Registries
//!
//! glprep reads the Khronos `gl.xml` registry, works out which types, enums and
//! commands a binding for one or more (API, version) targets must expose, and
//! lowers them into a renderer-agnostic IR that binding generators consume.
//!
//! ## Features
//!
//! - **Typed registry model**: the XML document becomes a closed set of node kinds
//! - **Requirement resolution**: per-target enum and command sets with the version
//!   that introduced each entity, honouring profile-specific removals
//! - **Multi-target intersection**: the least common denominator of several targets
//! - **Preparation**: configurable naming styles, type groups resolved to enums,
//!   value conversions and commands grouped by feature level
//! - **Output**: the IR as a JSON document or NDJSON records
//!
//! ## Example: Configuration
//!
//! ```yaml
//! naming:
//!   enum_case: PascalCase
//!   function_case: snake_case
//!   enum_value_case: UPPER_CASE
//!   omit_prefix: true
//! targets:
//!   apis: [gl]
//!   versions: ["3.3"]
//!   profile: core
//! ```
//!
//! ## Example: Library use
//!
//! ```no_run
//! use glprep::{pipeline, GeneratorOptions, Registry};
//!
//! let mut options = GeneratorOptions::default();
//! options.targets.apis = vec!["gl".parse()?];
//! options.targets.versions = vec!["3.3".parse()?];
//! pipeline::check_preconditions(&options)?;
//!
//! let registry = Registry::from_file("gl.xml")?;
//! let result = pipeline::parse_spec(&registry, &options)?;
//! for level in &result.feature_levels {
//!     println!("{} {}: {} commands", level.api, level.version, level.commands.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Registry document model
pub mod registry;

// Requirement resolution
pub mod feature;

// Entity extraction and preparation
pub mod parse;
pub mod prepare;

pub mod options;
pub mod pipeline;
pub mod serialization;
pub mod error;

// Re-export key types
pub use error::{Error, Result};
pub use feature::{
    merge_requirements, resolve_requirements, Feature, FeatureApi, FeatureError, FeatureVersion,
    Profile, Requirements,
};
pub use options::{Case, GeneratorOptions, NamingOptions, OptionsError, OutputFormat};
pub use pipeline::{check_preconditions, parse_spec, ParseResult};
pub use prepare::{
    prepare_commands, prepare_enums, prepare_feature_levels, transform_symbol, PrepareError,
    PreparedCommand, PreparedEnum, PreparedFeatureLevel,
};
pub use registry::{Registry, RegistryError};
pub use serialization::{write_output, write_result, NdjsonWriter, SerializationError};
