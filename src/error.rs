//! Crate level error

use thiserror::Error;

use crate::algorithms::CoordinateError;
use crate::processing::{PipelineError, SurveyError};
use crate::reference::ReferenceError;
use crate::utils::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    #[error("json serialization error")]
    Json(#[from] serde_json::Error),
    #[error("configuration error")]
    Config(#[from] ConfigError),
    #[error("antenna survey error")]
    Survey(#[from] SurveyError),
    #[error("center of array unavailable")]
    Reference(#[from] ReferenceError),
    #[error("coordinate error")]
    Coordinate(#[from] CoordinateError),
    #[error("conversion failed")]
    Pipeline(#[from] PipelineError),
}

pub type Result<T> = std::result::Result<T, Error>;
