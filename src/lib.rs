//! # magiklink
//!
//! **Inter-Container Link Repository**
//!
//! Establishes, persists, and exposes named links between a consumer
//! container and a provider container. A consumer receives the provider's
//! address and exposed ports as environment variables instead of
//! hardcoding IPs.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            magiklink                                │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                    LinkRepository                           │    │
//! │  │   new_link → get / links_for_consumer → refresh → remove    │    │
//! │  │            RwLock table │ optional links.json store         │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! │                              │                                      │
//! │  ┌───────────────────────────┼───────────────────────────────┐      │
//! │  │                  Link (validated snapshot)                │      │
//! │  │  provider running │ bridge address │ alias │ port set     │      │
//! │  └───────────────────────────┼───────────────────────────────┘      │
//! │                              │                                      │
//! │  ┌───────────────────────────┼───────────────────────────────┐      │
//! │  │                 Environment generation                    │      │
//! │  │  <ALIAS>_PORT… │ <ALIAS>_NAME │ <ALIAS>_ID │ <ALIAS>_ENV_…  │      │
//! │  └───────────────────────────────────────────────────────────┘      │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │   id: generate / truncate / normalize   │   port: Port, PortSet     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Collaborators
//!
//! - The lifecycle manager supplies [`ContainerRef`] snapshots.
//! - The network subsystem supplies the bridge address for `new_link`.
//! - The process launcher injects [`Link::to_env`] into the consumer.
//!
//! This crate does no routing, firewalling, discovery, or DNS.
//!
//! # Example
//!
//! ```rust,ignore
//! use magiklink::{ContainerRef, LinkRepository, PortSet};
//!
//! let redis = ContainerRef::new(magiklink::generate_id(), "172.17.0.2")
//!     .with_running(true)
//!     .with_ports(PortSet::parse(["6379/tcp"])?)
//!     .with_env(["PASSWORD=gordon"]);
//! let web = ContainerRef::new(magiklink::generate_id(), "172.17.0.3").with_name("web");
//!
//! let repo = LinkRepository::new("")?;
//! let link = repo.new_link(&web, &redis, "172.17.0.1", "db")?;
//! for var in link.to_env() {
//!     println!("{var}"); // DB_PORT=tcp://172.17.0.2:6379 ...
//! }
//! ```

pub mod constants;
pub mod container;
pub mod env;
pub mod error;
pub mod id;
pub mod link;
pub mod port;
pub mod repository;
pub mod store;

// Re-exports
pub use constants::*;
pub use container::ContainerRef;
pub use env::EnvTable;
pub use error::{Error, Result};
pub use id::{generate_id, link_id, normalize_alias, truncate_id};
pub use link::{Link, LinkState};
pub use port::{Port, PortSet, Protocol};
pub use repository::{LinkRepository, RefreshReport};
pub use store::LinkStore;
