use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Dial to agent {agent} at {addr} failed: {source}")]
    Connect {
        agent: String,
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Dial to agent {agent} at {addr} timed out after {timeout_ms}ms.")]
    ConnectTimeout {
        agent: String,
        addr: String,
        timeout_ms: u64,
    },
    #[error("Write to agent {agent} failed: {source}")]
    Write {
        agent: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Short write to agent {agent} ({written} of {expected} bytes).")]
    ShortWrite {
        agent: String,
        written: usize,
        expected: usize,
    },
    #[error("Read from agent {agent} failed: {source}")]
    Read {
        agent: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Read from agent {agent} timed out after {timeout_ms}ms.")]
    ReadTimeout { agent: String, timeout_ms: u64 },
    #[error("Agent {agent} closed the connection.")]
    ConnectionClosed { agent: String },
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
