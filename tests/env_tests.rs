//! Tests for link environment generation.
//!
//! Validates variable names and values, output ordering, determinism,
//! and provider environment passthrough.

use magiklink::env::{parse_assignment, port_url, port_vars};
use magiklink::{ContainerRef, EnvTable, Link, LinkRepository, Port, PortSet, generate_id, truncate_id};
use std::collections::HashMap;

fn link_with(ports: &[&str], env: &[&str]) -> (ContainerRef, Link) {
    let repo = LinkRepository::new("").unwrap();
    let to = ContainerRef::new(generate_id(), "172.0.17.2")
        .with_running(true)
        .with_ports(PortSet::parse(ports.iter().copied()).unwrap())
        .with_env(env.iter().copied());
    let from = ContainerRef::new(generate_id(), "172.0.17.3");

    let link = repo.new_link(&from, &to, "172.0.17.1", "docker").unwrap();
    (from, link)
}

fn env_map(link: &Link) -> HashMap<String, String> {
    link.to_env()
        .into_iter()
        .map(|e| {
            let (k, v) = e.split_once('=').expect("every entry has '='");
            (k.to_string(), v.to_string())
        })
        .collect()
}

// =============================================================================
// Variable Content Tests
// =============================================================================

#[test]
fn test_link_env() {
    let (from, link) = link_with(&["6379/tcp"], &["PASSWORD=gordon"]);

    let env = env_map(&link);

    assert_eq!(env["DOCKER_PORT"], "tcp://172.0.17.2:6379");
    assert_eq!(env["DOCKER_PORT_6379_TCP"], "tcp://172.0.17.2:6379");
    assert_eq!(env["DOCKER_PORT_6379_TCP_ADDR"], "172.0.17.2");
    assert_eq!(env["DOCKER_PORT_6379_TCP_PORT"], "6379");
    assert_eq!(env["DOCKER_PORT_6379_TCP_PROTO"], "tcp");
    assert_eq!(env["DOCKER_ID"], truncate_id(&from.id));
    assert_eq!(env["DOCKER_ENV_PASSWORD"], "gordon");
    assert_eq!(env["DOCKER_NAME"], format!("/{}/docker", truncate_id(&from.id)));
}

#[test]
fn test_id_is_consumer_not_provider() {
    let (from, link) = link_with(&["6379/tcp"], &[]);

    let env = env_map(&link);

    assert_eq!(env["DOCKER_ID"], truncate_id(&from.id));
    assert_ne!(env["DOCKER_ID"], link.to_id());
}

#[test]
fn test_primary_port_is_lowest() {
    let (_, link) = link_with(&["8080/tcp", "53/udp", "443/tcp"], &[]);

    let env = env_map(&link);

    assert_eq!(env["DOCKER_PORT"], "udp://172.0.17.2:53");
    assert_eq!(env["DOCKER_PORT_443_TCP"], "tcp://172.0.17.2:443");
    assert_eq!(env["DOCKER_PORT_8080_TCP"], "tcp://172.0.17.2:8080");
    assert_eq!(env["DOCKER_PORT_53_UDP_PROTO"], "udp");
}

#[test]
fn test_empty_ports_emit_no_port_family() {
    let (_, link) = link_with(&[], &["A=1"]);

    let env = link.to_env();

    assert!(env.iter().all(|e| !e.starts_with("DOCKER_PORT")));
    assert_eq!(env.len(), 3, "name, id, and one env var: {env:?}");
}

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_env_order() {
    let (from, link) = link_with(&["6379/tcp"], &["B=2", "A=1"]);
    let short = truncate_id(&from.id);

    let env = link.to_env();

    assert_eq!(
        env,
        vec![
            "DOCKER_PORT=tcp://172.0.17.2:6379".to_string(),
            "DOCKER_PORT_6379_TCP=tcp://172.0.17.2:6379".to_string(),
            "DOCKER_PORT_6379_TCP_ADDR=172.0.17.2".to_string(),
            "DOCKER_PORT_6379_TCP_PORT=6379".to_string(),
            "DOCKER_PORT_6379_TCP_PROTO=tcp".to_string(),
            format!("DOCKER_NAME=/{short}/docker"),
            format!("DOCKER_ID={short}"),
            "DOCKER_ENV_B=2".to_string(),
            "DOCKER_ENV_A=1".to_string(),
        ]
    );
}

#[test]
fn test_env_deterministic() {
    let (_, link) = link_with(&["9000/udp", "80/tcp", "9000/tcp"], &["X=1", "Y=2"]);

    assert_eq!(link.to_env(), link.to_env());
    assert_eq!(link.clone().to_env(), link.to_env());
}

// =============================================================================
// Provider Environment Tests
// =============================================================================

#[test]
fn test_home_and_path_not_exported() {
    let (_, link) = link_with(&[], &["HOME=/root", "PATH=/usr/bin", "USER=redis"]);

    let env = env_map(&link);

    assert!(!env.contains_key("DOCKER_ENV_HOME"));
    assert!(!env.contains_key("DOCKER_ENV_PATH"));
    assert_eq!(env["DOCKER_ENV_USER"], "redis");
}

#[test]
fn test_malformed_entries_skipped() {
    let (_, link) = link_with(&[], &["NOVALUE", "=orphan", "OK=yes"]);

    let keys: Vec<String> = link
        .to_env()
        .into_iter()
        .filter(|e| e.starts_with("DOCKER_ENV_"))
        .collect();

    assert_eq!(keys, vec!["DOCKER_ENV_OK=yes"]);
}

#[test]
fn test_value_with_equals_truncated_at_first_equals() {
    // Known edge case: "KEY=a=b" exports "a", not "a=b".
    let (_, link) = link_with(&[], &["DSN=user=admin", "EMPTY="]);

    let env = env_map(&link);

    assert_eq!(env["DOCKER_ENV_DSN"], "user");
    assert_eq!(env["DOCKER_ENV_EMPTY"], "");
}

// =============================================================================
// Table Builder Tests
// =============================================================================

#[test]
fn test_port_vars_without_link() {
    let port = Port::tcp(5432).unwrap();

    let vars = port_vars("10.1.0.5", port);

    let keys: Vec<&str> = vars.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "PORT_5432_TCP",
            "PORT_5432_TCP_ADDR",
            "PORT_5432_TCP_PORT",
            "PORT_5432_TCP_PROTO",
        ]
    );
    assert_eq!(vars[0].1, port_url("10.1.0.5", port));
}

#[test]
fn test_env_table_prefix_and_lookup() {
    let mut table = EnvTable::new("PG");
    table.push_port("10.1.0.5", Port::tcp(5432).unwrap());
    table.push("NAME", "/app/pg");

    assert_eq!(table.get("PG_PORT_5432_TCP_ADDR"), Some("10.1.0.5"));
    assert_eq!(table.get("PG_NAME"), Some("/app/pg"));
    assert_eq!(table.get("PG_MISSING"), None);
    assert_eq!(table.pairs().len(), 5);
    assert_eq!(table.into_assignments()[4], "PG_NAME=/app/pg");
}

#[test]
fn test_parse_assignment_splits_on_first_equals() {
    assert_eq!(parse_assignment("KEY=a=b"), Some(("KEY", "a")));
    assert_eq!(parse_assignment("KEY=value"), Some(("KEY", "value")));
}
