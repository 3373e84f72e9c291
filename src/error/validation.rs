use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Agent list entry {index} is empty in '{value}'.")]
    EmptyAgentName { value: String, index: usize },
    #[error("No agents configured. Set --load-agents/--lt-agents or --sym-agents.")]
    NoAgents,
    #[error("Agent '{name}' is listed more than once.")]
    DuplicateAgent { name: String },
    #[error("Invalid boolean value '{value}'.")]
    InvalidBoolean { value: String },
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
