//! Preparation of extracted entities into the generator IR.
//!
//! Names are re-cased according to [`NamingOptions`](crate::options::NamingOptions),
//! type groups are linked to prepared enums and commands are grouped by the
//! feature level that introduced them.

pub mod commands;
pub mod enums;
pub mod feature;
pub mod style;

pub use commands::{
    prepare_commands, CommandType, PreparedCommand, PreparedConversion, PreparedImplementation,
    PreparedParameter, TypeReference,
};
pub use enums::{prepare_enums, PreparedEnum, PreparedEnumValue};
pub use feature::{prepare_feature_levels, PreparedFeatureLevel};
pub use style::transform_symbol;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepareError {
    /// A required command has no prepared counterpart
    #[error("required command '{0}' was not found in the registry")]
    MissingCommand(String),
}
