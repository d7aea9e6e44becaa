//! Extraction of raw declarations from the typed registry.
//!
//! Extractors are guided by the names a target requires and produce plain
//! records; renaming and type resolution happen later in [`crate::prepare`].

pub mod commands;
pub mod enums;
pub mod types;

pub use commands::{extract_commands, Command, Parameter, Type};
pub use enums::{extract_enums, Enum, EnumValue};
pub use types::{extract_types, TypeDefinition};
