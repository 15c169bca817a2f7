use crate::FiniteVolume::fv_error::FvError;
use thiserror::Error;

/// error types of the chemotaxis model and of the task that drives it
#[derive(Debug, Error)]
pub enum ChemotaxisError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    #[error("Invalid parameter {name} = {value}")]
    InvalidParameter { name: String, value: f64 },
    #[error("Unknown parameter case: {0}")]
    UnknownCase(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Parameter file error: {0}")]
    ParameterFile(String),
    #[error("Finite volume error: {0}")]
    FiniteVolume(#[from] FvError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Plotting error: {0}")]
    Plot(String),
}
