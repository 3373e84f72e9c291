//! Configuration loading, application and resolution.
pub(crate) mod apply;
mod loader;
mod settings;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::load_config;
pub use settings::{ExperimentConfig, RunSettings, ServerConfig};

#[cfg(test)]
pub(crate) use loader::load_config_file;
