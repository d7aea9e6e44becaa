//! Enum groups required by a target.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

use crate::registry::{EnumValueNode, EnumsNode};

/// Value of the `type` attribute marking a flag collection
pub const BITMASK: &str = "bitmask";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name: String,
    /// Literal value text, e.g. `0x00000100`
    pub value: String,
}

/// A named group of enumerants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub name: String,
    pub is_bitmask: bool,
    /// Values in registry declaration order
    pub values: Vec<EnumValue>,
}

/// Map each group to its required values.
///
/// A value's own `group` list takes precedence over its container's group.
/// A value name is recorded once per group.
fn map_values_to_groups<'a>(
    containers: &[&'a EnumsNode],
    required: &HashSet<&str>,
) -> IndexMap<&'a str, Vec<&'a EnumValueNode>> {
    let mut groups: IndexMap<&str, Vec<&EnumValueNode>> = IndexMap::new();

    for &container in containers {
        for value in container.values() {
            if !required.contains(value.name.as_str()) {
                continue;
            }

            let declared: Vec<&str> = match (&value.groups, &container.group) {
                (Some(own), _) => own.iter().map(String::as_str).collect(),
                (None, Some(group)) => vec![group.as_str()],
                (None, None) => Vec::new(),
            };

            for group in declared {
                let members = groups.entry(group).or_default();
                if !members.iter().any(|member| member.name == value.name) {
                    members.push(value);
                }
            }
        }
    }

    groups
}

/// Extract every enum group containing at least one required value.
///
/// Groups are emitted for containers that declare a group attribute, in
/// container order.
pub fn extract_enums<S: AsRef<str>>(required: &[S], containers: &[&EnumsNode]) -> Vec<Enum> {
    let required: HashSet<&str> = required.iter().map(|name| name.as_ref()).collect();
    let groups = map_values_to_groups(containers, &required);

    let enums: Vec<Enum> = containers
        .iter()
        .filter_map(|container| {
            let name = container.group.as_deref()?;
            let values = groups.get(name)?;
            Some(Enum {
                name: name.to_string(),
                is_bitmask: container.kind.as_deref() == Some(BITMASK),
                values: values
                    .iter()
                    .map(|value| EnumValue {
                        name: value.name.clone(),
                        value: value.value.clone(),
                    })
                    .collect(),
            })
        })
        .collect();

    tracing::debug!(
        required = required.len(),
        groups = groups.len(),
        enums = enums.len(),
        "extracted enums"
    );
    enums
}
