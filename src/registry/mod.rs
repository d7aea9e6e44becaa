//! Typed model of the OpenGL registry document.
//!
//! The XML document is read once by [`Registry::parse`] and turned into a
//! closed set of node kinds. Every element the registry format defines maps
//! to a variant; anything else is rejected as a schema fault instead of being
//! skipped silently.

mod loader;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feature::{FeatureApi, FeatureVersion, Profile};

/// Errors raised while reading the registry document
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed registry document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected <registry> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement { parent: String, element: String },
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("<{parent}> is missing required element <{element}>")]
    MissingElement {
        parent: String,
        element: &'static str,
    },
    #[error("invalid value '{value}' for attribute '{attribute}' of <{element}>: {reason}")]
    InvalidAttribute {
        element: String,
        attribute: &'static str,
        value: String,
        reason: String,
    },
}

/// The parsed registry: its top-level nodes in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub nodes: Vec<RegistryNode>,
}

/// Kinds of node that may appear directly below `<registry>`.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryNode {
    Comment(String),
    Types(TypesNode),
    /// `<kinds>` and legacy `<groups>` carry no information needed here
    Kinds,
    Groups,
    Enums(EnumsNode),
    Commands(CommandsNode),
    Feature(FeatureNode),
    Extensions(ExtensionsNode),
}

/// `<types>`: verbatim C declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypesNode {
    pub types: Vec<TypeNode>,
}

/// A single `<type>` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    /// The `name` attribute, used by non-typedef entries such as includes
    pub name: Option<String>,
    pub api: Option<String>,
    /// All text content with tags stripped
    pub text: String,
}

/// `<enums>`: a collection of enumerant values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumsNode {
    pub namespace: Option<String>,
    pub group: Option<String>,
    /// The `type` attribute, `bitmask` for flag collections
    pub kind: Option<String>,
    pub children: Vec<EnumsChild>,
}

impl EnumsNode {
    pub fn values(&self) -> impl Iterator<Item = &EnumValueNode> {
        self.children.iter().filter_map(|child| match child {
            EnumsChild::Value(value) => Some(value),
            EnumsChild::Unused => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumsChild {
    Value(EnumValueNode),
    /// `<unused>` reserves a value range
    Unused,
}

/// A single `<enum>` value
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueNode {
    pub name: String,
    pub value: String,
    /// Explicit group membership overriding the container's group
    pub groups: Option<Vec<String>>,
    pub api: Option<String>,
}

/// `<commands>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandsNode {
    pub namespace: Option<String>,
    pub commands: Vec<CommandNode>,
}

/// A single `<command>`
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub proto: Declaration,
    pub params: Vec<Declaration>,
    pub alias: Option<String>,
    pub vecequiv: Option<String>,
}

/// A `<proto>` or `<param>` element: C declaration text interleaved with
/// `<ptype>` and `<name>` markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    /// The `group` attribute naming the semantic type
    pub group: Option<String>,
    pub fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    /// `<ptype>`: reference to a platform type
    PlatformType(String),
    /// `<name>`: the declared identifier
    Name(String),
}

impl Declaration {
    /// Text of the first `<name>` fragment
    pub fn name(&self) -> Option<&str> {
        self.fragments.iter().find_map(|fragment| match fragment {
            Fragment::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// `<feature>`: a feature level
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureNode {
    pub api: FeatureApi,
    pub name: String,
    pub version: FeatureVersion,
    pub requires: Vec<RequirementBlock>,
    pub removes: Vec<RequirementBlock>,
}

/// A `<require>` or `<remove>` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementBlock {
    pub profile: Option<Profile>,
    pub api: Option<FeatureApi>,
    pub entries: Vec<RequiredEntity>,
}

impl RequirementBlock {
    /// Whether this block applies to a target of the given api and profile
    pub fn applies_to(&self, api: FeatureApi, profile: Profile) -> bool {
        self.profile.map_or(true, |p| p == profile) && self.api.map_or(true, |a| a == api)
    }

    pub fn enum_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            RequiredEntity::Enum(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            RequiredEntity::Command(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredEntity {
    Type(String),
    Enum(String),
    Command(String),
}

/// `<extensions>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionsNode {
    pub extensions: Vec<ExtensionNode>,
}

/// A single `<extension>`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionNode {
    pub name: String,
    /// The `supported` attribute split on `|`, e.g. `gl`, `glcore`, `gles2`
    pub supported: Vec<String>,
    pub requires: Vec<RequirementBlock>,
    pub removes: Vec<RequirementBlock>,
}

impl Registry {
    /// Parse a registry document from its XML text
    pub fn parse(text: &str) -> Result<Self, RegistryError> {
        loader::parse_registry(text)
    }

    /// Read and parse a registry document from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read registry document");
        Self::parse(&text)
    }

    /// The `<types>` container, if present
    pub fn types(&self) -> Option<&TypesNode> {
        self.nodes.iter().find_map(|node| match node {
            RegistryNode::Types(types) => Some(types),
            _ => None,
        })
    }

    /// Every `<enums>` container in document order
    pub fn enums(&self) -> impl Iterator<Item = &EnumsNode> {
        self.nodes.iter().filter_map(|node| match node {
            RegistryNode::Enums(enums) => Some(enums),
            _ => None,
        })
    }

    /// The `<commands>` container, if present
    pub fn commands(&self) -> Option<&CommandsNode> {
        self.nodes.iter().find_map(|node| match node {
            RegistryNode::Commands(commands) => Some(commands),
            _ => None,
        })
    }

    /// Every `<feature>` in document order
    pub fn features(&self) -> impl Iterator<Item = &FeatureNode> {
        self.nodes.iter().filter_map(|node| match node {
            RegistryNode::Feature(feature) => Some(feature),
            _ => None,
        })
    }

    /// Every `<extension>` across all `<extensions>` containers
    pub fn extensions(&self) -> impl Iterator<Item = &ExtensionNode> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RegistryNode::Extensions(extensions) => Some(extensions),
                _ => None,
            })
            .flat_map(|extensions| extensions.extensions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry>
    <comment>Test registry</comment>
    <types>
        <type name="khrplatform">#include &lt;KHR/khrplatform.h&gt;</type>
        <type>typedef unsigned int <name>GLenum</name>;</type>
    </types>
    <enums namespace="GL" group="AttribMask" type="bitmask">
        <enum value="0x00000001" name="GL_CURRENT_BIT"/>
        <unused start="0x0002" comment="reserved"/>
        <enum value="0x00000100" name="GL_DEPTH_BUFFER_BIT" group="ClearBufferMask,AttribMask"/>
    </enums>
    <commands namespace="GL">
        <command>
            <proto>void <name>glClear</name></proto>
            <param group="ClearBufferMask"><ptype>GLbitfield</ptype> <name>mask</name></param>
            <glx type="render" opcode="127"/>
        </command>
    </commands>
    <feature api="gl" name="GL_VERSION_1_0" number="1.0">
        <require>
            <type name="GLenum"/>
            <enum name="GL_CURRENT_BIT"/>
            <command name="glClear"/>
        </require>
        <remove profile="core">
            <enum name="GL_CURRENT_BIT"/>
        </remove>
    </feature>
    <extensions>
        <extension name="GL_AMD_test" supported="gl|glcore|gles2">
            <require>
                <command name="glTestAMD"/>
            </require>
        </extension>
    </extensions>
</registry>
"#;

    #[test]
    fn test_parse_node_kinds() {
        let registry = Registry::parse(REGISTRY).unwrap();

        assert_eq!(registry.nodes.len(), 6);
        assert!(matches!(registry.nodes[0], RegistryNode::Comment(ref c) if c == "Test registry"));
        assert!(registry.types().is_some());
        assert_eq!(registry.enums().count(), 1);
        assert!(registry.commands().is_some());
        assert_eq!(registry.features().count(), 1);
        assert_eq!(registry.extensions().count(), 1);
    }

    #[test]
    fn test_parse_types_text() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let types = registry.types().unwrap();

        assert_eq!(types.types[0].name.as_deref(), Some("khrplatform"));
        assert_eq!(types.types[0].text, "#include <KHR/khrplatform.h>");
        assert_eq!(types.types[1].name, None);
        assert_eq!(types.types[1].text, "typedef unsigned int GLenum;");
    }

    #[test]
    fn test_parse_enum_values() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let enums = registry.enums().next().unwrap();

        assert_eq!(enums.group.as_deref(), Some("AttribMask"));
        assert_eq!(enums.kind.as_deref(), Some("bitmask"));
        assert_eq!(enums.children.len(), 3);

        let values: Vec<_> = enums.values().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].groups, None);
        assert_eq!(
            values[1].groups,
            Some(vec!["ClearBufferMask".to_string(), "AttribMask".to_string()])
        );
    }

    #[test]
    fn test_parse_command_fragments() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let command = &registry.commands().unwrap().commands[0];

        assert_eq!(command.proto.name(), Some("glClear"));
        assert_eq!(
            command.proto.fragments,
            vec![
                Fragment::Text("void ".to_string()),
                Fragment::Name("glClear".to_string()),
            ]
        );
        assert_eq!(command.params.len(), 1);
        assert_eq!(command.params[0].group.as_deref(), Some("ClearBufferMask"));
        assert_eq!(
            command.params[0].fragments,
            vec![
                Fragment::PlatformType("GLbitfield".to_string()),
                Fragment::Text(" ".to_string()),
                Fragment::Name("mask".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_feature_blocks() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let feature = registry.features().next().unwrap();

        assert_eq!(feature.api, FeatureApi::Gl);
        assert_eq!(feature.version, FeatureVersion::new(1, 0));
        assert_eq!(feature.requires.len(), 1);
        assert_eq!(feature.requires[0].entries.len(), 3);
        assert_eq!(
            feature.requires[0].command_names().collect::<Vec<_>>(),
            vec!["glClear"]
        );
        assert_eq!(feature.removes[0].profile, Some(Profile::Core));
        assert!(feature.removes[0].applies_to(FeatureApi::Gl, Profile::Core));
        assert!(!feature.removes[0].applies_to(FeatureApi::Gl, Profile::Compatibility));
    }

    #[test]
    fn test_parse_extension_support() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let extension = registry.extensions().next().unwrap();

        assert_eq!(extension.name, "GL_AMD_test");
        assert_eq!(extension.supported, vec!["gl", "glcore", "gles2"]);
    }

    #[test]
    fn test_unexpected_element_is_rejected() {
        let err = Registry::parse("<registry><platforms/></registry>").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnexpectedElement { ref parent, ref element }
                if parent == "registry" && element == "platforms"
        ));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let err = Registry::parse("<spec/>").unwrap_err();
        assert!(matches!(err, RegistryError::UnexpectedRoot(ref root) if root == "spec"));
    }

    #[test]
    fn test_invalid_feature_api_is_rejected() {
        let err = Registry::parse(
            r#"<registry><feature api="vulkan" name="VK_VERSION_1_0" number="1.0"/></registry>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidAttribute { attribute: "api", ref value, .. } if value == "vulkan"
        ));
    }

    #[test]
    fn test_command_without_proto_is_rejected() {
        let err = Registry::parse(
            r#"<registry><commands><command><param><name>x</name></param></command></commands></registry>"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::MissingElement { element: "proto", .. }));
    }
}
