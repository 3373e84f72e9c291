use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Config '{field}' must be >= 1.")]
    FieldMustBePositive { field: &'static str },
    #[error("Invalid load pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
    #[error("Unknown load pattern '{pattern}'. Use fixed, step, test, or corr.")]
    UnknownPattern { pattern: String },
    #[error("Fixed pattern is only supported with symmetric agents.")]
    FixedRequiresSymmetricAgents,
    #[error("Correlation sweep requires symmetric agents.")]
    CorrRequiresSymmetricAgents,
    #[error("Asymmetric test requires at least one latency agent.")]
    AsymmetricRequiresLatencyAgents,
    #[error(
        "Measurement would never collect samples (load {load} ops/s at {sampling_rate}% sampling)."
    )]
    NoSampleFlow { load: u64, sampling_rate: f64 },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
