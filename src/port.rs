//! Exposed port declarations.
//!
//! A [`Port`] is a number plus a protocol tag with the canonical text form
//! `"<number>/<protocol>"` (e.g. `6379/tcp`). A [`PortSet`] keeps ports in
//! ascending `(number, protocol)` order so that everything derived from it
//! (environment variables, logs, the persisted store) is reproducible
//! byte-for-byte.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Protocol
// =============================================================================

/// Transport protocol of an exposed port.
///
/// Declaration order defines sort order: `tcp` sorts before `udp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP.
    Tcp,
    /// UDP.
    Udp,
}

impl Protocol {
    /// Returns the lowercase tag (`tcp`/`udp`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }

    /// Returns the uppercase tag used in environment keys.
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("tcp") {
            Ok(Self::Tcp)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(Self::Udp)
        } else {
            Err(Error::InvalidPortSpec {
                spec: s.to_string(),
                reason: format!("unrecognized protocol '{s}'"),
            })
        }
    }
}

// =============================================================================
// Port
// =============================================================================

/// A single exposed port.
///
/// Invariant: `number` is in `1..=65535`. Ordering is by number, then
/// protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Port {
    number: u16,
    protocol: Protocol,
}

impl Port {
    /// Creates a port, rejecting port number 0.
    pub fn new(number: u16, protocol: Protocol) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidPortSpec {
                spec: format!("{number}/{protocol}"),
                reason: "port number must be in 1..=65535".to_string(),
            });
        }
        Ok(Self { number, protocol })
    }

    /// Creates a TCP port.
    pub fn tcp(number: u16) -> Result<Self> {
        Self::new(number, Protocol::Tcp)
    }

    /// Creates a UDP port.
    pub fn udp(number: u16) -> Result<Self> {
        Self::new(number, Protocol::Udp)
    }

    /// Returns the port number.
    #[must_use]
    pub const fn number(self) -> u16 {
        self.number
    }

    /// Returns the protocol.
    #[must_use]
    pub const fn protocol(self) -> Protocol {
        self.protocol
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.protocol)
    }
}

impl FromStr for Port {
    type Err = Error;

    /// Parses `"<number>/<protocol>"`. A bare `"<number>"` means TCP.
    fn from_str(spec: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPortSpec {
            spec: spec.to_string(),
            reason,
        };

        let (number, protocol) = match spec.split_once('/') {
            Some((number, protocol)) => (
                number,
                protocol
                    .parse::<Protocol>()
                    .map_err(|_| invalid(format!("unrecognized protocol '{protocol}'")))?,
            ),
            None => (spec, Protocol::Tcp),
        };

        let out_of_range = || invalid("port number must be in 1..=65535".to_string());
        // Digits only: no whitespace, no sign
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(out_of_range());
        }
        let number: u16 = number.parse().map_err(|_| out_of_range())?;

        Self::new(number, protocol).map_err(|_| out_of_range())
    }
}

impl TryFrom<String> for Port {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Port> for String {
    fn from(port: Port) -> Self {
        port.to_string()
    }
}

// =============================================================================
// PortSet
// =============================================================================

/// Ordered, deduplicated set of exposed ports.
///
/// Iteration is ascending by `(number, protocol)`. Serialized as a list of
/// canonical strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortSet(BTreeSet<Port>);

impl PortSet {
    /// Creates an empty port set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a list of port declarations. Fails on the first invalid one.
    pub fn parse<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        specs.into_iter().map(str::parse).collect()
    }

    /// Adds a port. Returns `false` if it was already present.
    pub fn insert(&mut self, port: Port) -> bool {
        self.0.insert(port)
    }

    /// Returns true if the set contains `port`.
    #[must_use]
    pub fn contains(&self, port: &Port) -> bool {
        self.0.contains(port)
    }

    /// Returns the primary port (the lowest in iteration order).
    #[must_use]
    pub fn first(&self) -> Option<Port> {
        self.0.first().copied()
    }

    /// Iterates ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of ports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no ports are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Port> for PortSet {
    fn from_iter<T: IntoIterator<Item = Port>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Port> for PortSet {
    fn extend<T: IntoIterator<Item = Port>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PortSet {
    type Item = Port;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Port>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}
