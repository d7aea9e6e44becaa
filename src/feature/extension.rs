//! Registry extensions.
//!
//! Extensions are parsed down to their names and the entities they list, but
//! they do not contribute to a target's requirements yet:
//! [`extension_requirements`] is the single place a contribution rule plugs in.

use serde::Serialize;

use super::{Feature, Requirements};
use crate::registry::ExtensionNode;

/// An extension as declared by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    pub name: String,
    /// API names from the `supported` attribute, e.g. `glcore`
    pub supported: Vec<String>,
    pub required_enums: Vec<String>,
    pub required_commands: Vec<String>,
}

impl Extension {
    pub fn from_node(node: &ExtensionNode) -> Self {
        let required_enums = node
            .requires
            .iter()
            .flat_map(|block| block.enum_names())
            .map(str::to_string)
            .collect();
        let required_commands = node
            .requires
            .iter()
            .flat_map(|block| block.command_names())
            .map(str::to_string)
            .collect();

        Self {
            name: node.name.clone(),
            supported: node.supported.clone(),
            required_enums,
            required_commands,
        }
    }

    /// Whether the extension names `api` among its supported APIs
    pub fn supports(&self, api: &str) -> bool {
        self.supported.iter().any(|s| s == api)
    }
}

/// Extensions that list the target's API family as supported
pub fn supported_extensions<'a>(
    target: &Feature,
    extensions: &'a [Extension],
) -> impl Iterator<Item = &'a Extension> + 'a {
    let api = target.api.to_string();
    extensions.iter().filter(move |extension| extension.supports(&api))
}

/// Requirements the given extensions add to `target`. Always empty.
pub fn extension_requirements(target: &Feature, extensions: &[Extension]) -> Requirements {
    tracing::trace!(
        target_feature = %target,
        supported = supported_extensions(target, extensions).count(),
        "extensions contribute no requirements"
    );
    Requirements::default()
}
