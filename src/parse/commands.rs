//! Commands required by a target.
//!
//! Prototype and parameter declarations are split into the platform type a C
//! compiler sees and the semantic group the registry assigns, keeping the
//! qualifiers and pointer suffixes around the platform type.

use serde::Serialize;
use std::collections::HashSet;

use crate::registry::{CommandNode, CommandsNode, Declaration, Fragment, RegistryError};

/// A declared type split around its platform type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    /// Platform type, e.g. `GLuint`
    pub low_level: String,
    /// Semantic group, e.g. `Texture`; equals `low_level` when absent
    pub high_level: String,
    /// Text preceding the platform type, e.g. `const`
    pub front_modifiers: Option<String>,
    /// Text following the platform type, e.g. `*`
    pub back_modifiers: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub name: String,
    pub return_type: Type,
    /// Parameters in call-signature order
    pub params: Vec<Parameter>,
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Text of every `Text` fragment in the slice
fn joined_text(fragments: &[&Fragment]) -> String {
    fragments
        .iter()
        .filter_map(|fragment| match fragment {
            Fragment::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Parse the type part of a declaration, ignoring its `<name>`.
pub fn parse_type(declaration: &Declaration) -> Type {
    let fragments: Vec<&Fragment> = declaration
        .fragments
        .iter()
        .filter(|fragment| !matches!(fragment, Fragment::Name(_)))
        .collect();

    let ptype = fragments
        .iter()
        .enumerate()
        .find_map(|(index, fragment)| match fragment {
            Fragment::PlatformType(name) => Some((index, name)),
            _ => None,
        });

    let (low_level, front_modifiers, back_modifiers) = match ptype {
        Some((index, name)) => {
            let front = non_empty(&joined_text(&fragments[..index]));
            // only the text directly trailing the platform type
            let back = match fragments.get(index + 1) {
                Some(Fragment::Text(text)) => non_empty(text),
                _ => None,
            };
            (name.trim().to_string(), front, back)
        }
        None => {
            let text: String = fragments
                .iter()
                .map(|fragment| match fragment {
                    Fragment::Text(text) | Fragment::PlatformType(text) | Fragment::Name(text) => {
                        text.as_str()
                    }
                })
                .collect();
            (text.trim().to_string(), None, None)
        }
    };

    Type {
        high_level: declaration
            .group
            .clone()
            .unwrap_or_else(|| low_level.clone()),
        low_level,
        front_modifiers,
        back_modifiers,
    }
}

fn declared_name(declaration: &Declaration, context: &str) -> Result<String, RegistryError> {
    declaration
        .name()
        .map(str::to_string)
        .ok_or_else(|| RegistryError::MissingElement {
            parent: context.to_string(),
            element: "name",
        })
}

/// Parse a single command node.
pub fn parse_command(node: &CommandNode) -> Result<Command, RegistryError> {
    let name = declared_name(&node.proto, "proto")?;
    let params = node
        .params
        .iter()
        .map(|param| {
            Ok(Parameter {
                name: declared_name(param, "param")?,
                type_: parse_type(param),
            })
        })
        .collect::<Result<Vec<_>, RegistryError>>()?;

    Ok(Command {
        return_type: parse_type(&node.proto),
        name,
        params,
    })
}

/// Extract every required command, in registry order.
pub fn extract_commands<S: AsRef<str>>(
    required: &[S],
    commands: &CommandsNode,
) -> Result<Vec<Command>, RegistryError> {
    let required: HashSet<&str> = required.iter().map(|name| name.as_ref()).collect();

    let mut extracted = Vec::new();
    for node in &commands.commands {
        let name = declared_name(&node.proto, "proto")?;
        if required.contains(name.as_str()) {
            extracted.push(parse_command(node)?);
        }
    }

    tracing::debug!(
        required = required.len(),
        extracted = extracted.len(),
        "extracted commands"
    );
    Ok(extracted)
}
