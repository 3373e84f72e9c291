use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU32, NonZeroU64};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Transport the agents use towards the system under test.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum CommProto {
    #[default]
    #[serde(rename = "TCP", alias = "tcp")]
    #[value(name = "TCP")]
    Tcp,
    #[serde(rename = "R2P2", alias = "r2p2")]
    #[value(name = "R2P2")]
    R2p2,
}

impl CommProto {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CommProto::Tcp => "TCP",
            CommProto::R2p2 => "R2P2",
        }
    }
}

/// Comma-separated agent host list. Entries are trimmed and must be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentList(Vec<String>);

impl AgentList {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for AgentList {
    type Error = ValidationError;

    fn try_from(entries: Vec<String>) -> Result<Self, Self::Error> {
        let joined = entries.join(",");
        let mut names: Vec<String> = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let name = entry.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyAgentName {
                    value: joined,
                    index,
                });
            }
            if names.iter().any(|known| known == name) {
                return Err(ValidationError::DuplicateAgent {
                    name: name.to_owned(),
                });
            }
            names.push(name.to_owned());
        }
        Ok(Self(names))
    }
}

impl std::str::FromStr for AgentList {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        AgentList::try_from(s.split(',').map(str::to_owned).collect::<Vec<_>>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU32(NonZeroU32);

impl PositiveU32 {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for PositiveU32 {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .map(PositiveU32)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU32 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU32::try_from(value)
    }
}

impl From<PositiveU32> for u32 {
    fn from(value: PositiveU32) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}
