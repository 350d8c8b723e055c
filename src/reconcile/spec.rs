// ABOUTME: Canonical node container specification and drift detection.
// ABOUTME: Builds the desired spec and checks structural containment in inspected state.

use crate::config::NodeConfig;
use crate::runtime::{ContainerDetails, ContainerSpec, PortBinding};
use serde_json::{Map, Value, json};

/// TCP port the node serves its HTTP API on inside the container.
pub const NODE_HTTP_PORT: &str = "8888/tcp";
/// TCP port the node listens for p2p peers on inside the container.
pub const NODE_P2P_PORT: &str = "9876/tcp";

/// The fixed nodeos invocation: block production enabled, the full
/// development plugin set, and the HTTP server bound to all interfaces.
const NODE_CMD: &str = concat!(
    "nodeos -e -p eosio",
    " --plugin eosio::wallet_api_plugin",
    " --plugin eosio::wallet_plugin",
    " --plugin eosio::producer_plugin",
    " --plugin eosio::history_plugin",
    " --plugin eosio::chain_api_plugin",
    " --plugin eosio::history_api_plugin",
    " --plugin eosio::http_plugin",
    " -d /mnt/dev/data",
    " --config-dir /mnt/dev/config",
    " --http-server-address=0.0.0.0:8888",
    " --access-control-allow-origin=*",
    " --contracts-console",
);

/// Build the canonical desired container specification for a node.
pub fn node_container_spec(config: &NodeConfig) -> ContainerSpec {
    ContainerSpec {
        name: config.name.clone(),
        image: config.image.clone(),
        command: vec![
            "/bin/bash".to_string(),
            "-c".to_string(),
            NODE_CMD.to_string(),
        ],
        exposed_ports: vec![NODE_HTTP_PORT.to_string(), NODE_P2P_PORT.to_string()],
        binds: config.binds.clone(),
        port_bindings: vec![PortBinding {
            container_port: NODE_HTTP_PORT.to_string(),
            host_ip: String::new(),
            host_port: config.host_port.clone(),
        }],
    }
}

/// Whether the inspected container satisfies the desired specification.
///
/// This is a structural superset match: every field the desired spec
/// names must be present with an equal value in the inspected
/// configuration, while fields the daemon has defaulted on its own are
/// tolerated. It is deliberately not symmetric.
pub fn spec_matches(spec: &ContainerSpec, details: &ContainerDetails) -> bool {
    is_contained(&desired_value(spec), &observed_value(details))
}

/// Render the desired spec in the daemon's wire format, the same shape
/// inspection reports back.
///
/// `Binds` is omitted entirely when no mounts are requested: daemons
/// report the field back as null in that case, and an absent key leaves
/// it unconstrained.
pub(crate) fn desired_value(spec: &ContainerSpec) -> Value {
    let exposed: Map<String, Value> = spec
        .exposed_ports
        .iter()
        .map(|port| (port.clone(), json!({})))
        .collect();

    let mut bindings = Map::new();
    for binding in &spec.port_bindings {
        bindings.insert(
            binding.container_port.clone(),
            json!([{ "HostIp": binding.host_ip, "HostPort": binding.host_port }]),
        );
    }

    let mut host_config = Map::new();
    if !spec.binds.is_empty() {
        host_config.insert("Binds".to_string(), json!(spec.binds));
    }
    host_config.insert("PortBindings".to_string(), Value::Object(bindings));

    json!({
        "name": spec.name.as_str(),
        "Image": spec.image.to_string(),
        "Cmd": spec.command,
        "ExposedPorts": Value::Object(exposed),
        "HostConfig": Value::Object(host_config),
    })
}

/// Merge an inspection snapshot into one object comparable against
/// [`desired_value`]: the `Config` fields, the name, and `HostConfig`.
pub(crate) fn observed_value(details: &ContainerDetails) -> Value {
    let mut merged = match &details.config {
        Value::Object(obj) => obj.clone(),
        _ => Map::new(),
    };
    merged.insert("name".to_string(), Value::String(details.name.clone()));
    merged.insert("HostConfig".to_string(), details.host_config.clone());
    Value::Object(merged)
}

/// Deep containment of `want` in `have`.
///
/// Objects match by key containment, arrays pairwise by position (bind
/// order is significant), everything else by equality.
pub(crate) fn is_contained(want: &Value, have: &Value) -> bool {
    match (want, have) {
        (Value::Object(want), Value::Object(have)) => want
            .iter()
            .all(|(key, value)| have.get(key).is_some_and(|other| is_contained(value, other))),
        (Value::Array(want), Value::Array(have)) => {
            want.len() == have.len()
                && want
                    .iter()
                    .zip(have.iter())
                    .all(|(value, other)| is_contained(value, other))
        }
        _ => want == have,
    }
}
