//! Enum groups renamed for generated code.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use super::style::transform_symbol;
use crate::options::NamingOptions;
use crate::parse::Enum;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedEnumValue {
    pub name: String,
    pub value: String,
}

/// An enum group as it appears in generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedEnum {
    pub name: String,
    /// Group name in the registry
    pub original_name: String,
    pub namespace: String,
    pub is_bitmask: bool,
    pub values: Vec<PreparedEnumValue>,
}

impl PreparedEnum {
    fn from_enum(group: &Enum, naming: &NamingOptions) -> Self {
        Self {
            name: transform_symbol(&group.name, naming.enum_case, naming.omit_prefix),
            original_name: group.name.clone(),
            namespace: naming.enum_namespace.clone(),
            is_bitmask: group.is_bitmask,
            values: group
                .values
                .iter()
                .map(|value| PreparedEnumValue {
                    name: transform_symbol(
                        &value.name,
                        naming.enum_value_case,
                        naming.omit_prefix,
                    ),
                    value: value.value.clone(),
                })
                .collect(),
        }
    }
}

/// Prepare enums, keyed by their registry group name.
///
/// Prepared enums are shared with the type references that point at them.
pub fn prepare_enums(
    enums: &[Enum],
    naming: &NamingOptions,
) -> IndexMap<String, Arc<PreparedEnum>> {
    enums
        .iter()
        .map(|group| {
            (
                group.name.clone(),
                Arc::new(PreparedEnum::from_enum(group, naming)),
            )
        })
        .collect()
}
