use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppResult;

use super::agent::{AgentLink, AgentRole};

/// Agent host names per role, in command-line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRoster {
    #[serde(default)]
    pub throughput: Vec<String>,
    #[serde(default)]
    pub latency: Vec<String>,
    #[serde(default)]
    pub symmetric: Vec<String>,
}

impl AgentRoster {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.throughput.is_empty() && self.latency.is_empty() && self.symmetric.is_empty()
    }

    #[must_use]
    pub fn count(&self, group: AgentGroup) -> usize {
        match group {
            AgentGroup::Throughput => self.throughput.len(),
            AgentGroup::Latency => self.latency.len(),
            AgentGroup::Symmetric => self.symmetric.len(),
            AgentGroup::Load => self.throughput.len().saturating_add(self.latency.len()),
        }
    }

    /// Every `(name, role)` pair in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, AgentRole)> {
        let throughput = self
            .throughput
            .iter()
            .map(|name| (name.as_str(), AgentRole::Throughput));
        let latency = self
            .latency
            .iter()
            .map(|name| (name.as_str(), AgentRole::Latency));
        let symmetric = self
            .symmetric
            .iter()
            .map(|name| (name.as_str(), AgentRole::Symmetric));
        throughput.chain(latency).chain(symmetric)
    }
}

/// Subset of the fleet a command is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentGroup {
    Throughput,
    Latency,
    Symmetric,
    /// Throughput and latency agents together.
    Load,
}

impl AgentGroup {
    #[must_use]
    pub const fn contains(self, role: AgentRole) -> bool {
        match self {
            AgentGroup::Throughput => matches!(role, AgentRole::Throughput),
            AgentGroup::Latency => matches!(role, AgentRole::Latency),
            AgentGroup::Symmetric => matches!(role, AgentRole::Symmetric),
            AgentGroup::Load => matches!(role, AgentRole::Throughput | AgentRole::Latency),
        }
    }
}

/// Every open agent link, owned exclusively by the coordinator.
#[derive(Debug, Default)]
pub struct Fleet {
    links: Vec<AgentLink>,
}

impl Fleet {
    /// Connects to every agent in the roster, in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first connection failure.
    pub async fn connect(roster: &AgentRoster, port: u16) -> AppResult<Self> {
        let mut links = Vec::with_capacity(roster.entries().count());
        for (name, role) in roster.entries() {
            links.push(AgentLink::connect(name, role, port).await?);
        }
        info!("Connected to {} agents", links.len());
        Ok(Self { links })
    }

    #[must_use]
    pub const fn from_links(links: Vec<AgentLink>) -> Self {
        Self { links }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[must_use]
    pub fn count(&self, group: AgentGroup) -> usize {
        self.links
            .iter()
            .filter(|link| group.contains(link.role()))
            .count()
    }

    /// Mutable handles to the links of `group`, in registration order.
    #[must_use]
    pub fn select_mut(&mut self, group: AgentGroup) -> Vec<&mut AgentLink> {
        self.links
            .iter_mut()
            .filter(|link| group.contains(link.role()))
            .collect()
    }
}
