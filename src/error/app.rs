use thiserror::Error;

use super::{
    ConfigError, DeployError, ExperimentError, ProtocolError, TransportError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("Experiment failure: {0}")]
    Experiment(#[from] ExperimentError),
    #[error("Deployment error: {0}")]
    Deploy(#[from] DeployError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn transport<E>(error: E) -> Self
    where
        E: Into<TransportError>,
    {
        error.into().into()
    }

    pub fn protocol<E>(error: E) -> Self
    where
        E: Into<ProtocolError>,
    {
        error.into().into()
    }

    pub fn experiment<E>(error: E) -> Self
    where
        E: Into<ExperimentError>,
    {
        error.into().into()
    }

    pub fn deploy<E>(error: E) -> Self
    where
        E: Into<DeployError>,
    {
        error.into().into()
    }
}
