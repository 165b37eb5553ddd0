//! Link entity.
//!
//! A [`Link`] is a snapshot of a provider container's network identity,
//! bound to a consumer under an alias. Links are values: after
//! construction the only mutation is [`Link::refresh`], which re-reads the
//! provider's address and ports after a restart.
//!
//! ## State Machine
//!
//! ```text
//!              refresh (running)
//!          ┌──────────────────────┐
//!          ▼                      │
//!   ┌──────────┐  refresh   ┌─────────┐
//!   │  Active  │ ─────────► │  Stale  │
//!   └────┬─────┘ (stopped)  └────┬────┘
//!        │                       │
//!        └──────── remove ───────┴──────► Removed
//! ```
//!
//! `Removed` is not represented here: a removed link no longer exists in
//! its repository.

use crate::container::ContainerRef;
use crate::error::{Error, Result};
use crate::id::{link_id, normalize_alias, truncate_id};
use crate::port::PortSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Link State
// =============================================================================

/// Whether a link's snapshot is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    /// Provider was running at the last snapshot.
    #[default]
    Active,
    /// Provider has stopped; address and port data are unreliable.
    Stale,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Stale => write!(f, "stale"),
        }
    }
}

// =============================================================================
// Link
// =============================================================================

/// A named link from a consumer container to a provider container.
///
/// Deserialization re-checks the invariants `Link::build` establishes, so a
/// hand-edited or corrupt record cannot produce a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LinkRecord")]
pub struct Link {
    to_id: String,
    from_id: String,
    to_ip: String,
    from_ip: String,
    bridge_interface: String,
    alias: String,
    display_alias: String,
    name: String,
    ports: PortSet,
    provider_env: Vec<String>,
    state: LinkState,
    created_at: DateTime<Utc>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Serialized form of a [`Link`], validated on conversion.
#[derive(Deserialize)]
struct LinkRecord {
    to_id: String,
    from_id: String,
    to_ip: String,
    from_ip: String,
    bridge_interface: String,
    alias: String,
    display_alias: String,
    name: String,
    ports: PortSet,
    provider_env: Vec<String>,
    #[serde(default)]
    state: LinkState,
    created_at: DateTime<Utc>,
    #[serde(default)]
    refreshed_at: Option<DateTime<Utc>>,
}

impl TryFrom<LinkRecord> for Link {
    type Error = Error;

    fn try_from(record: LinkRecord) -> Result<Self> {
        if record.to_id.is_empty() || record.from_id.is_empty() {
            return Err(Error::InvalidLink("empty container ID".to_string()));
        }
        if record.bridge_interface.is_empty() {
            return Err(Error::MissingBridgeAddress);
        }
        if record.alias.is_empty() || record.display_alias.is_empty() {
            return Err(Error::MissingAlias);
        }
        if record.alias != normalize_alias(&record.alias) {
            return Err(Error::InvalidLink(format!(
                "alias '{}' is not normalized",
                record.alias
            )));
        }
        if record.alias != normalize_alias(&record.display_alias) {
            return Err(Error::InvalidLink(format!(
                "alias '{}' does not match display alias '{}'",
                record.alias, record.display_alias
            )));
        }

        Ok(Self {
            to_id: record.to_id,
            from_id: record.from_id,
            to_ip: record.to_ip,
            from_ip: record.from_ip,
            bridge_interface: record.bridge_interface,
            alias: record.alias,
            display_alias: record.display_alias,
            name: record.name,
            ports: record.ports,
            provider_env: record.provider_env,
            state: record.state,
            created_at: record.created_at,
            refreshed_at: record.refreshed_at,
        })
    }
}

impl Link {
    /// Validates inputs and snapshots a new link.
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. provider is running
    /// 2. bridge address is non-empty
    /// 3. alias is non-empty
    ///
    /// Uniqueness of the resulting ID is the repository's job.
    pub(crate) fn build(
        consumer: &ContainerRef,
        provider: &ContainerRef,
        bridge_address: &str,
        alias: &str,
    ) -> Result<Self> {
        if !provider.running {
            return Err(Error::ProviderNotRunning {
                id: truncate_id(&provider.id).to_string(),
            });
        }
        if bridge_address.is_empty() {
            return Err(Error::MissingBridgeAddress);
        }
        if alias.is_empty() {
            return Err(Error::MissingAlias);
        }

        Ok(Self {
            to_id: truncate_id(&provider.id).to_string(),
            from_id: truncate_id(&consumer.id).to_string(),
            to_ip: provider.ip_address.clone(),
            from_ip: consumer.ip_address.clone(),
            bridge_interface: bridge_address.to_string(),
            alias: normalize_alias(alias),
            display_alias: alias.to_string(),
            name: format!("/{}/{}", consumer.display_name(), alias),
            ports: provider.exposed_ports.clone(),
            provider_env: provider.env.clone(),
            state: LinkState::Active,
            created_at: Utc::now(),
            refreshed_at: None,
        })
    }

    /// Returns the composite ID `<consumer short id>:<ALIAS>`.
    #[must_use]
    pub fn id(&self) -> String {
        link_id(&self.from_id, &self.alias)
    }

    /// Truncated provider ID.
    #[must_use]
    pub fn to_id(&self) -> &str {
        &self.to_id
    }

    /// Truncated consumer ID.
    #[must_use]
    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    /// Provider IP at the last snapshot.
    #[must_use]
    pub fn to_ip(&self) -> &str {
        &self.to_ip
    }

    /// Consumer IP at creation.
    #[must_use]
    pub fn from_ip(&self) -> &str {
        &self.from_ip
    }

    /// Bridge interface address for the link's network segment.
    #[must_use]
    pub fn bridge_interface(&self) -> &str {
        &self.bridge_interface
    }

    /// Normalized (uppercase) alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Alias exactly as the caller supplied it.
    #[must_use]
    pub fn display_alias(&self) -> &str {
        &self.display_alias
    }

    /// Display identity, `/<consumer name>/<alias>`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider's exposed ports at the last snapshot.
    #[must_use]
    pub fn ports(&self) -> &PortSet {
        &self.ports
    }

    /// Provider's declared environment at creation.
    #[must_use]
    pub fn provider_env(&self) -> &[String] {
        &self.provider_env
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Returns true if the provider was stopped at the last refresh.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.state == LinkState::Stale
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last successful refresh, if any.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Re-snapshots the provider's address and ports.
    ///
    /// `provider` must be the same container (by truncated ID). A stopped
    /// provider marks the link stale and returns `ProviderNotRunning`; a
    /// running one updates `to_ip` and `ports` and marks the link active.
    pub fn refresh(&mut self, provider: &ContainerRef) -> Result<()> {
        let actual = truncate_id(&provider.id);
        if actual != self.to_id {
            return Err(Error::ProviderIdentityMismatch {
                expected: self.to_id.clone(),
                actual: actual.to_string(),
            });
        }

        if !provider.running {
            self.state = LinkState::Stale;
            return Err(Error::ProviderNotRunning {
                id: self.to_id.clone(),
            });
        }

        self.to_ip.clone_from(&provider.ip_address);
        self.ports.clone_from(&provider.exposed_ports);
        self.state = LinkState::Active;
        self.refreshed_at = Some(Utc::now());
        Ok(())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.id(), self.to_id, self.state)
    }
}
