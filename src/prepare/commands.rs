//! Commands prepared for generated wrappers.
//!
//! Every command gets a default implementation: the wrapper takes the
//! parameters with their resolved types, casts each one to the low-level
//! type and casts the low-level return value back.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use super::enums::PreparedEnum;
use super::style::transform_symbol;
use crate::options::NamingOptions;
use crate::parse::{Command, Type};

/// Kind of wrapper generated for a command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    #[default]
    Default,
    /// Commands that create names, e.g. `glGenTextures`
    Generator,
    /// Commands that release names, e.g. `glDeleteTextures`
    Deleter,
}

/// A declared type with its group resolved to a prepared enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReference {
    pub low_level: String,
    /// `None` when the group is not a known enum
    pub high_level: Option<Arc<PreparedEnum>>,
    pub front_modifiers: Option<String>,
    pub back_modifiers: Option<String>,
}

impl TypeReference {
    fn resolve(type_: &Type, prepared_enums: &IndexMap<String, Arc<PreparedEnum>>) -> Self {
        let high_level = prepared_enums.get(&type_.high_level).cloned();
        if high_level.is_none() {
            tracing::trace!(group = %type_.high_level, "no prepared enum for group");
        }

        Self {
            low_level: type_.low_level.clone(),
            high_level,
            front_modifiers: type_.front_modifiers.clone(),
            back_modifiers: type_.back_modifiers.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedParameter {
    #[serde(rename = "type")]
    pub type_ref: TypeReference,
    pub name: String,
}

/// How a value crosses the wrapper boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreparedConversion {
    /// Cast `param` to the given type
    Cast { param: String, to: TypeReference },
    /// Call `method` on `param` with `args`
    MethodCall {
        param: String,
        method: String,
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedImplementation {
    pub return_type: TypeReference,
    pub params: Vec<PreparedParameter>,
    /// Converts [`Self::RETVAL_TEMPORARY`] to the return type
    pub retval_conversion: PreparedConversion,
    /// One conversion per parameter, in parameter order
    pub param_conversions: Vec<PreparedConversion>,
}

impl PreparedImplementation {
    /// Name of the temporary holding the raw return value
    pub const RETVAL_TEMPORARY: &'static str = "retval";

    fn default_for(
        command: &Command,
        prepared_enums: &IndexMap<String, Arc<PreparedEnum>>,
    ) -> Self {
        let return_type = TypeReference::resolve(&command.return_type, prepared_enums);
        let params: Vec<PreparedParameter> = command
            .params
            .iter()
            .map(|param| PreparedParameter {
                type_ref: TypeReference::resolve(&param.type_, prepared_enums),
                name: param.name.clone(),
            })
            .collect();

        let param_conversions = params
            .iter()
            .map(|param| PreparedConversion::Cast {
                param: param.name.clone(),
                to: param.type_ref.clone(),
            })
            .collect();

        Self {
            retval_conversion: PreparedConversion::Cast {
                param: Self::RETVAL_TEMPORARY.to_string(),
                to: return_type.clone(),
            },
            return_type,
            params,
            param_conversions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedCommand {
    pub name: String,
    /// Command name in the registry
    pub original_name: String,
    pub namespace: String,
    pub command_type: CommandType,
    pub implementation: PreparedImplementation,
}

/// Prepare commands, keyed by their registry name.
///
/// Parameter names are kept as declared.
pub fn prepare_commands(
    commands: &[Command],
    prepared_enums: &IndexMap<String, Arc<PreparedEnum>>,
    naming: &NamingOptions,
) -> IndexMap<String, PreparedCommand> {
    commands
        .iter()
        .map(|command| {
            let prepared = PreparedCommand {
                name: transform_symbol(&command.name, naming.function_case, naming.omit_prefix),
                original_name: command.name.clone(),
                namespace: naming.command_namespace.clone(),
                command_type: CommandType::Default,
                implementation: PreparedImplementation::default_for(command, prepared_enums),
            };
            (command.name.clone(), prepared)
        })
        .collect()
}
