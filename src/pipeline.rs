//! End-to-end run from a parsed registry to the prepared IR.
//!
//! ```no_run
//! use glprep::{pipeline, GeneratorOptions, Registry};
//!
//! let options = GeneratorOptions::from_file("glprep.yaml")?;
//! pipeline::check_preconditions(&options)?;
//! let registry = Registry::from_file("gl.xml")?;
//! let result = pipeline::parse_spec(&registry, &options)?;
//! println!("{} feature levels", result.feature_levels.len());
//! # Ok::<(), glprep::Error>(())
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::feature::{resolve_requirements, Extension, Feature, Requirements};
use crate::options::GeneratorOptions;
use crate::parse::{extract_commands, extract_enums, extract_types, Command, Enum, TypeDefinition};
use crate::prepare::{
    prepare_commands, prepare_enums, prepare_feature_levels, PreparedEnum, PreparedFeatureLevel,
};
use crate::registry::{EnumsNode, FeatureNode, Registry};

/// The complete IR of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// The resolved target, or the merged sentinel for several targets
    pub feature: Feature,
    pub requirements: Requirements,
    pub types: Vec<TypeDefinition>,
    /// Prepared enums keyed by registry group name
    pub enums: IndexMap<String, Arc<PreparedEnum>>,
    pub feature_levels: Vec<PreparedFeatureLevel>,
}

/// Entities extracted for the resolved requirements, before preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definitions {
    pub feature: Feature,
    pub requirements: Requirements,
    pub types: Vec<TypeDefinition>,
    pub enums: Vec<Enum>,
    pub commands: Vec<Command>,
}

/// Check the options before the registry is read.
pub fn check_preconditions(options: &GeneratorOptions) -> Result<()> {
    options.validate()?;
    Ok(())
}

/// Resolve the requested targets and extract what they require.
pub fn parse_definitions(registry: &Registry, options: &GeneratorOptions) -> Result<Definitions> {
    let levels: Vec<&FeatureNode> = registry.features().collect();
    let extensions: Vec<Extension> = registry.extensions().map(Extension::from_node).collect();

    let (feature, requirements) = resolve_requirements(
        &options.targets.features(),
        &levels,
        &extensions,
        options.targets.profile,
    )?;
    if requirements.is_empty() {
        tracing::warn!(feature = %feature, "target requires no enums or commands");
    }

    let types = registry.types().map(extract_types).unwrap_or_default();

    let required_enums: Vec<&str> = requirements.enums.keys().map(String::as_str).collect();
    let containers: Vec<&EnumsNode> = registry.enums().collect();
    let enums = extract_enums(&required_enums, &containers);

    let required_commands: Vec<&str> = requirements.commands.keys().map(String::as_str).collect();
    let commands = match registry.commands() {
        Some(node) => extract_commands(&required_commands, node)?,
        None => Vec::new(),
    };

    tracing::info!(
        feature = %feature,
        types = types.len(),
        enums = enums.len(),
        commands = commands.len(),
        "parsed definitions"
    );

    Ok(Definitions {
        feature,
        requirements,
        types,
        enums,
        commands,
    })
}

/// Run resolution, extraction and preparation.
pub fn parse_spec(registry: &Registry, options: &GeneratorOptions) -> Result<ParseResult> {
    let Definitions {
        feature,
        requirements,
        types,
        enums,
        commands,
    } = parse_definitions(registry, options)?;

    let prepared_enums = prepare_enums(&enums, &options.naming);
    let prepared_commands = prepare_commands(&commands, &prepared_enums, &options.naming);
    let feature_levels = prepare_feature_levels(feature.api, &requirements, &prepared_commands)?;

    Ok(ParseResult {
        feature,
        requirements,
        types,
        enums: prepared_enums,
        feature_levels,
    })
}
