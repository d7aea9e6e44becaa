//! Verbatim C type definitions.

use serde::Serialize;

use crate::registry::TypesNode;

/// `name` of the `<type>` entry holding the platform `#include`
pub const PLATFORM_INCLUDE: &str = "khrplatform";

/// A C declaration, copied as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    pub statement: String,
}

/// Every type definition except the platform include, in registry order.
pub fn extract_types(types: &TypesNode) -> Vec<TypeDefinition> {
    types
        .types
        .iter()
        .filter(|node| node.name.as_deref() != Some(PLATFORM_INCLUDE))
        .map(|node| TypeDefinition {
            statement: node.text.clone(),
        })
        .collect()
}
