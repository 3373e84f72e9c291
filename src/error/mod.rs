mod app;
mod config;
mod deploy;
mod experiment;
mod protocol;
mod transport;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use deploy::DeployError;
pub use experiment::ExperimentError;
pub use protocol::{ProtocolError, WireError};
pub use transport::TransportError;
pub use validation::ValidationError;
