use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(
        "Max tries reached for '{pattern}' after {iterations} iterations ({retries} retries, last phase {phase})."
    )]
    MaxTriesReached {
        pattern: String,
        iterations: u32,
        retries: u32,
        phase: &'static str,
    },
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
