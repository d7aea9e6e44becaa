//! Crate-level error type.

use thiserror::Error;

use crate::feature::FeatureError;
use crate::options::OptionsError;
use crate::prepare::PrepareError;
use crate::registry::RegistryError;
use crate::serialization::SerializationError;

/// Any failure of a generator run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error("failed to write output: {0}")]
    Serialization(#[from] SerializationError),
}

pub type Result<T> = std::result::Result<T, Error>;
