//! Container snapshots handed in by the lifecycle manager.
//!
//! The link layer never owns or mutates containers. It reads a
//! [`ContainerRef`] once, at the call that received it, and copies what it
//! needs.

use crate::port::PortSet;
use serde::{Deserialize, Serialize};

/// Read-only view of a container at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    /// Full container identifier.
    pub id: String,
    /// Display name (without leading `/`). May be empty.
    #[serde(default)]
    pub name: String,
    /// Whether the container is running.
    pub running: bool,
    /// Current IP address. Only meaningful while running.
    #[serde(default)]
    pub ip_address: String,
    /// Declared exposed ports.
    #[serde(default)]
    pub exposed_ports: PortSet,
    /// Declared environment, as `KEY=VALUE` entries.
    #[serde(default)]
    pub env: Vec<String>,
}

impl ContainerRef {
    /// Creates a stopped container with no ports or environment.
    #[must_use]
    pub fn new(id: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ip_address: ip_address.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the running flag.
    #[must_use]
    pub fn with_running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }

    /// Sets the exposed ports.
    #[must_use]
    pub fn with_ports(mut self, ports: PortSet) -> Self {
        self.exposed_ports = ports;
        self
    }

    /// Sets the declared environment.
    #[must_use]
    pub fn with_env<I, S>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = env.into_iter().map(Into::into).collect();
        self
    }

    /// Name shown to consumers: the display name without a leading `/`,
    /// or the truncated ID when the container is unnamed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = self.name.trim_start_matches('/');
        if name.is_empty() {
            crate::id::truncate_id(&self.id)
        } else {
            name
        }
    }
}
