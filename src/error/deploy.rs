use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Agent binary '{path}' is not readable: {source}")]
    BinaryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Agent binary path '{path}' has no file name.")]
    BinaryWithoutName { path: PathBuf },
    #[error("Cannot determine the local user name (USER and LOGNAME are unset).")]
    UnknownUser,
    #[error("Failed to run {program} for {host}: {source}")]
    Spawn {
        program: &'static str,
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} for {host} exited with status {status}.")]
    CommandFailed {
        program: &'static str,
        host: String,
        status: std::process::ExitStatus,
    },
    #[error("Remote session for {host} ended during startup with status {status}.")]
    SessionEnded {
        host: String,
        status: std::process::ExitStatus,
    },
}
