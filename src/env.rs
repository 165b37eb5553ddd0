//! Environment generation for linked containers.
//!
//! Turns a [`Link`] into the ordered `KEY=VALUE` list injected into the
//! consumer's process. Every key is prefixed with the link's normalized
//! alias:
//!
//! ```text
//! DOCKER_PORT=tcp://172.0.17.2:6379            primary port only
//! DOCKER_PORT_6379_TCP=tcp://172.0.17.2:6379   one block per port ...
//! DOCKER_PORT_6379_TCP_ADDR=172.0.17.2
//! DOCKER_PORT_6379_TCP_PORT=6379
//! DOCKER_PORT_6379_TCP_PROTO=tcp
//! DOCKER_NAME=/web/docker
//! DOCKER_ID=<consumer short id>
//! DOCKER_ENV_PASSWORD=gordon                   one per provider env entry
//! ```
//!
//! Output order is fixed (ports ascending, then name and ID, then provider
//! environment in declaration order), so unchanged links always produce
//! identical output.

use crate::constants::FILTERED_ENV_KEYS;
use crate::link::Link;
use crate::port::Port;
use tracing::debug;

/// Ordered list of environment variables sharing one alias prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTable {
    prefix: String,
    vars: Vec<(String, String)>,
}

impl EnvTable {
    /// Creates an empty table for a normalized alias.
    #[must_use]
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            prefix: alias.into(),
            vars: Vec::new(),
        }
    }

    /// Appends `<ALIAS>_<suffix>=<value>`.
    pub fn push(&mut self, suffix: &str, value: impl Into<String>) {
        self.vars
            .push((format!("{}_{}", self.prefix, suffix), value.into()));
    }

    /// Appends the full variable block for one port.
    pub fn push_port(&mut self, ip: &str, port: Port) {
        for (suffix, value) in port_vars(ip, port) {
            self.push(&suffix, value);
        }
    }

    /// Returns the variables as `(key, value)` pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Looks up a variable by full key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the table as `KEY=VALUE` strings.
    #[must_use]
    pub fn into_assignments(self) -> Vec<String> {
        self.vars
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect()
    }
}

/// Returns `<proto>://<ip>:<port>`.
#[must_use]
pub fn port_url(ip: &str, port: Port) -> String {
    format!("{}://{}:{}", port.protocol(), ip, port.number())
}

/// Builds the per-port variable suffixes for one port.
///
/// Suffixes are relative to the alias prefix, e.g. `PORT_6379_TCP_ADDR`.
#[must_use]
pub fn port_vars(ip: &str, port: Port) -> Vec<(String, String)> {
    let base = format!("PORT_{}_{}", port.number(), port.protocol().as_key());
    vec![
        (base.clone(), port_url(ip, port)),
        (format!("{base}_ADDR"), ip.to_string()),
        (format!("{base}_PORT"), port.number().to_string()),
        (format!("{base}_PROTO"), port.protocol().as_str().to_string()),
    ]
}

/// Splits a declared `KEY=VALUE` entry.
///
/// The key ends at the first `=` and the value ends at the next one, so
/// `KEY=a=b` yields `("KEY", "a")`. Entries without `=` or with an empty key
/// yield `None`.
#[must_use]
pub fn parse_assignment(entry: &str) -> Option<(&str, &str)> {
    let (key, rest) = entry.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    let value = rest.split('=').next().unwrap_or_default();
    Some((key, value))
}

impl Link {
    /// Builds the environment table for this link.
    #[must_use]
    pub fn env_table(&self) -> EnvTable {
        let mut table = EnvTable::new(self.alias());

        if let Some(primary) = self.ports().first() {
            table.push("PORT", port_url(self.to_ip(), primary));
        }
        for port in self.ports() {
            table.push_port(self.to_ip(), port);
        }

        table.push("NAME", self.name());
        table.push("ID", self.from_id());

        for entry in self.provider_env() {
            let Some((key, value)) = parse_assignment(entry) else {
                debug!("Skipping malformed env entry for link {}: {:?}", self.id(), entry);
                continue;
            };
            if FILTERED_ENV_KEYS.contains(&key) {
                continue;
            }
            table.push(&format!("ENV_{key}"), value);
        }

        table
    }

    /// Returns the ordered `KEY=VALUE` environment for the consumer.
    #[must_use]
    pub fn to_env(&self) -> Vec<String> {
        self.env_table().into_assignments()
    }
}
