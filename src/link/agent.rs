use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{AppError, AppResult, ProtocolError, TransportError};
use crate::wire::{Reply, ReplyExpectation, decode_reply};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Generates background load only.
    Throughput,
    /// Measures latency at a fixed low rate.
    Latency,
    /// Generates load and measures latency on the same connections.
    Symmetric,
}

impl AgentRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AgentRole::Throughput => "throughput",
            AgentRole::Latency => "latency",
            AgentRole::Symmetric => "symmetric",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One long-lived management connection to one agent.
#[derive(Debug)]
pub struct AgentLink {
    name: String,
    role: AgentRole,
    addr: String,
    stream: TcpStream,
}

impl AgentLink {
    /// Dials `name:port`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Connect` or `TransportError::ConnectTimeout`.
    pub async fn connect(name: &str, role: AgentRole, port: u16) -> AppResult<Self> {
        let addr = format!("{}:{}", name, port);
        let stream = match timeout(CONNECT_TIMEOUT, TcpStream::connect(addr.as_str())).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(AppError::transport(TransportError::Connect {
                    agent: name.to_owned(),
                    addr,
                    source: err,
                }));
            }
            Err(_elapsed) => {
                return Err(AppError::transport(TransportError::ConnectTimeout {
                    agent: name.to_owned(),
                    addr,
                    timeout_ms: duration_ms(CONNECT_TIMEOUT),
                }));
            }
        };
        if let Err(err) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY for {}: {}", addr, err);
        }
        debug!("Connected to {} agent {} at {}", role, name, addr);
        Ok(Self {
            name: name.to_owned(),
            role,
            addr,
            stream,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn role(&self) -> AgentRole {
        self.role
    }

    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Writes `bytes` with a single write call. Partial writes are not retried.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Write` on I/O failure and
    /// `TransportError::ShortWrite` if fewer bytes were accepted.
    pub async fn send(&mut self, bytes: &Bytes) -> AppResult<()> {
        let written = self.stream.write(bytes).await.map_err(|err| {
            AppError::transport(TransportError::Write {
                agent: self.name.clone(),
                source: err,
            })
        })?;
        if written != bytes.len() {
            return Err(AppError::transport(TransportError::ShortWrite {
                agent: self.name.clone(),
                written,
                expected: bytes.len(),
            }));
        }
        Ok(())
    }

    /// Performs one read of at most `buffer_len` bytes within `deadline` and
    /// decodes it as `expectation`.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` for timeouts, closed connections and I/O
    /// failures, and `ProtocolError::Reply` when the bytes do not decode.
    pub async fn read_reply(
        &mut self,
        expectation: ReplyExpectation,
        buffer_len: usize,
        deadline: Duration,
    ) -> AppResult<Reply> {
        let mut buffer = vec![0u8; buffer_len];
        let bytes_read = match timeout(deadline, self.stream.read(&mut buffer)).await {
            Ok(Ok(0)) => {
                return Err(AppError::transport(TransportError::ConnectionClosed {
                    agent: self.name.clone(),
                }));
            }
            Ok(Ok(count)) => count,
            Ok(Err(err)) => {
                return Err(AppError::transport(TransportError::Read {
                    agent: self.name.clone(),
                    source: err,
                }));
            }
            Err(_elapsed) => {
                return Err(AppError::transport(TransportError::ReadTimeout {
                    agent: self.name.clone(),
                    timeout_ms: duration_ms(deadline),
                }));
            }
        };
        buffer.truncate(bytes_read);
        let raw = Bytes::from(buffer);
        decode_reply(expectation, raw.clone()).map_err(|err| {
            AppError::protocol(ProtocolError::Reply {
                agent: self.name.clone(),
                raw: raw.to_vec(),
                source: err,
            })
        })
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
