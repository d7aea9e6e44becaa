//! Conversion of the XML tree into the typed registry model.

use roxmltree::{Document, Node};

use crate::feature::{FeatureApi, FeatureVersion};

use super::{
    CommandNode, CommandsNode, Declaration, EnumValueNode, EnumsChild, EnumsNode, ExtensionNode,
    ExtensionsNode, FeatureNode, Fragment, Registry, RegistryError, RegistryNode,
    RequiredEntity, RequirementBlock, TypeNode, TypesNode,
};

pub(super) fn parse_registry(text: &str) -> Result<Registry, RegistryError> {
    let document = Document::parse(text)?;
    let root = document.root_element();
    if root.tag_name().name() != "registry" {
        return Err(RegistryError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    let nodes = elements(root)
        .map(|node| match node.tag_name().name() {
            "comment" => Ok(RegistryNode::Comment(all_text(node))),
            "types" => parse_types(node).map(RegistryNode::Types),
            "kinds" => Ok(RegistryNode::Kinds),
            "groups" => Ok(RegistryNode::Groups),
            "enums" => parse_enums(node).map(RegistryNode::Enums),
            "commands" => parse_commands(node).map(RegistryNode::Commands),
            "feature" => parse_feature(node).map(RegistryNode::Feature),
            "extensions" => parse_extensions(node).map(RegistryNode::Extensions),
            _ => Err(unexpected(root, node)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(nodes = nodes.len(), "parsed registry");
    Ok(Registry { nodes })
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Concatenation of every descendant text node, tags stripped
fn all_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn tag(node: Node) -> String {
    node.tag_name().name().to_string()
}

fn unexpected(parent: Node, node: Node) -> RegistryError {
    RegistryError::UnexpectedElement {
        parent: tag(parent),
        element: tag(node),
    }
}

fn optional_attr(node: Node, attribute: &str) -> Option<String> {
    node.attribute(attribute).map(str::to_string)
}

fn required_attr<'a>(node: Node<'a, '_>, attribute: &'static str) -> Result<&'a str, RegistryError> {
    node.attribute(attribute)
        .ok_or_else(|| RegistryError::MissingAttribute {
            element: tag(node),
            attribute,
        })
}

/// Parse an attribute through `FromStr`, reporting the parse error as the reason
fn parsed_attr<T>(node: Node, attribute: &'static str) -> Result<Option<T>, RegistryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    node.attribute(attribute)
        .map(|value| {
            value
                .parse()
                .map_err(|e: T::Err| RegistryError::InvalidAttribute {
                    element: tag(node),
                    attribute,
                    value: value.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

fn parse_types(node: Node) -> Result<TypesNode, RegistryError> {
    let types = elements(node)
        .map(|child| match child.tag_name().name() {
            "type" => Ok(TypeNode {
                name: optional_attr(child, "name"),
                api: optional_attr(child, "api"),
                text: all_text(child),
            }),
            _ => Err(unexpected(node, child)),
        })
        .collect::<Result<_, _>>()?;
    Ok(TypesNode { types })
}

fn parse_enums(node: Node) -> Result<EnumsNode, RegistryError> {
    let children = elements(node)
        .map(|child| match child.tag_name().name() {
            "enum" => Ok(EnumsChild::Value(EnumValueNode {
                name: required_attr(child, "name")?.to_string(),
                value: required_attr(child, "value")?.to_string(),
                groups: child
                    .attribute("group")
                    .map(|groups| groups.split(',').map(str::to_string).collect()),
                api: optional_attr(child, "api"),
            })),
            "unused" => Ok(EnumsChild::Unused),
            _ => Err(unexpected(node, child)),
        })
        .collect::<Result<_, _>>()?;

    Ok(EnumsNode {
        namespace: optional_attr(node, "namespace"),
        group: optional_attr(node, "group"),
        kind: optional_attr(node, "type"),
        children,
    })
}

fn parse_commands(node: Node) -> Result<CommandsNode, RegistryError> {
    let commands = elements(node)
        .map(|child| match child.tag_name().name() {
            "command" => parse_command(child),
            _ => Err(unexpected(node, child)),
        })
        .collect::<Result<_, _>>()?;

    Ok(CommandsNode {
        namespace: optional_attr(node, "namespace"),
        commands,
    })
}

fn parse_command(node: Node) -> Result<CommandNode, RegistryError> {
    let mut proto = None;
    let mut params = Vec::new();
    let mut alias = None;
    let mut vecequiv = None;

    for child in elements(node) {
        match child.tag_name().name() {
            "proto" => proto = Some(parse_declaration(child)?),
            "param" => params.push(parse_declaration(child)?),
            "alias" => alias = Some(required_attr(child, "name")?.to_string()),
            "vecequiv" => vecequiv = Some(required_attr(child, "name")?.to_string()),
            // GLX protocol opcodes
            "glx" => {}
            _ => return Err(unexpected(node, child)),
        }
    }

    let proto = proto.ok_or_else(|| RegistryError::MissingElement {
        parent: tag(node),
        element: "proto",
    })?;

    Ok(CommandNode {
        proto,
        params,
        alias,
        vecequiv,
    })
}

fn parse_declaration(node: Node) -> Result<Declaration, RegistryError> {
    let mut fragments = Vec::new();

    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                fragments.push(Fragment::Text(text.to_string()));
            }
            continue;
        }
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "ptype" => fragments.push(Fragment::PlatformType(all_text(child))),
            "name" => fragments.push(Fragment::Name(all_text(child))),
            _ => return Err(unexpected(node, child)),
        }
    }

    Ok(Declaration {
        group: optional_attr(node, "group"),
        fragments,
    })
}

fn parse_feature(node: Node) -> Result<FeatureNode, RegistryError> {
    let api: FeatureApi = parsed_attr(node, "api")?.ok_or_else(|| RegistryError::MissingAttribute {
        element: tag(node),
        attribute: "api",
    })?;
    let version: FeatureVersion = parsed_attr(node, "number")?.ok_or_else(|| RegistryError::MissingAttribute {
        element: tag(node),
        attribute: "number",
    })?;
    let name = required_attr(node, "name")?.to_string();
    let (requires, removes) = parse_blocks(node)?;

    Ok(FeatureNode {
        api,
        name,
        version,
        requires,
        removes,
    })
}

/// Split the `<require>` and `<remove>` children of a feature or extension
fn parse_blocks(
    node: Node,
) -> Result<(Vec<RequirementBlock>, Vec<RequirementBlock>), RegistryError> {
    let mut requires = Vec::new();
    let mut removes = Vec::new();

    for child in elements(node) {
        match child.tag_name().name() {
            "require" => requires.push(parse_block(child)?),
            "remove" => removes.push(parse_block(child)?),
            _ => return Err(unexpected(node, child)),
        }
    }

    Ok((requires, removes))
}

fn parse_block(node: Node) -> Result<RequirementBlock, RegistryError> {
    let entries = elements(node)
        .map(|child| {
            let entity: fn(String) -> RequiredEntity = match child.tag_name().name() {
                "type" => RequiredEntity::Type,
                "enum" => RequiredEntity::Enum,
                "command" => RequiredEntity::Command,
                _ => return Err(unexpected(node, child)),
            };
            Ok(entity(required_attr(child, "name")?.to_string()))
        })
        .collect::<Result<_, _>>()?;

    Ok(RequirementBlock {
        profile: parsed_attr(node, "profile")?,
        api: parsed_attr(node, "api")?,
        entries,
    })
}

fn parse_extensions(node: Node) -> Result<ExtensionsNode, RegistryError> {
    let extensions = elements(node)
        .map(|child| match child.tag_name().name() {
            "extension" => parse_extension(child),
            _ => Err(unexpected(node, child)),
        })
        .collect::<Result<_, _>>()?;
    Ok(ExtensionsNode { extensions })
}

fn parse_extension(node: Node) -> Result<ExtensionNode, RegistryError> {
    let name = required_attr(node, "name")?.to_string();
    let supported = node
        .attribute("supported")
        .map(|s| s.split('|').map(str::to_string).collect())
        .unwrap_or_default();
    let (requires, removes) = parse_blocks(node)?;

    Ok(ExtensionNode {
        name,
        supported,
        requires,
        removes,
    })
}
