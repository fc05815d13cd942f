//! Export document definitions.
//!
//! Fields are declared in alphabetical order so documents come out with
//! sorted keys, like the node manifests embedded in them.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::node::{Manifest, Node};
use crate::topology::{Team, Topology};

/// Main network document listing every node
#[derive(Serialize, Debug, PartialEq)]
pub struct NetworkDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caddy: Option<Caddy>,
    pub nodes: Vec<Manifest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Plugins>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceRoute>,
}

/// Ingress proxy toggle
#[derive(Serialize, Debug, PartialEq)]
pub struct Caddy {
    pub enabled: bool,
}

/// A web service exposed through the ingress proxy
#[derive(Serialize, Debug, PartialEq)]
pub struct ServiceRoute {
    pub host: String,
    pub path: String,
    pub port: u16,
    pub title: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Plugins {
    #[serde(rename = "preDeploy")]
    pub pre_deploy: BTreeMap<String, PluginReference>,
}

/// Plugin invoked by the deployment tooling before nodes start
#[derive(Serialize, Debug, PartialEq)]
pub struct PluginReference {
    pub entrypoint: String,
    pub instance: String,
    pub name: String,
}

/// Values applied to every node of a network
#[derive(Serialize, Debug, PartialEq)]
pub struct NetworkDefaults {
    pub warnet: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct NamespacesDocument {
    pub namespaces: Vec<NamespaceEntry>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct NamespaceEntry {
    pub name: String,
}

/// Permissions granted inside every team namespace
#[derive(Serialize, Debug, PartialEq)]
pub struct NamespaceDefaults {
    pub users: Vec<NamespaceUser>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct NamespaceUser {
    pub name: String,
    pub roles: Vec<String>,
}

fn render_nodes(topology: &Topology, nodes: &[Node]) -> Vec<Manifest> {
    let ctx = topology.render_context();
    nodes.iter().map(|node| node.manifest(&ctx)).collect()
}

impl NetworkDocument {
    /// The main fleet with the visualizer service and its plugin
    pub fn battlefield(topology: &Topology) -> Self {
        let mut pre_deploy = BTreeMap::new();
        pre_deploy.insert(
            "lnvisualizer".to_string(),
            PluginReference {
                entrypoint: "../../plugins/lnvisualizer".to_string(),
                instance: "miner".to_string(),
                name: "lnd-ln".to_string(),
            },
        );

        NetworkDocument {
            caddy: Some(Caddy { enabled: true }),
            nodes: render_nodes(topology, topology.nodes()),
            plugins: Some(Plugins { pre_deploy }),
            services: vec![ServiceRoute {
                host: "lnvisualizer.default".to_string(),
                path: "/lnvisualizer/".to_string(),
                port: 80,
                title: "LN Visualizer Web UI".to_string(),
            }],
        }
    }

    /// The armada nodes alone
    pub fn armada(topology: &Topology) -> Self {
        NetworkDocument {
            caddy: None,
            nodes: render_nodes(topology, topology.armada()),
            plugins: None,
            services: Vec::new(),
        }
    }
}

impl NetworkDefaults {
    pub fn new(network_name: &str) -> Self {
        Self {
            warnet: network_name.to_string(),
        }
    }
}

impl NamespacesDocument {
    pub fn for_teams(teams: &[Team]) -> Self {
        Self {
            namespaces: teams
                .iter()
                .map(|team| NamespaceEntry { name: team.namespace() })
                .collect(),
        }
    }
}

impl Default for NamespaceDefaults {
    fn default() -> Self {
        Self {
            users: vec![NamespaceUser {
                name: "warnet-user".to_string(),
                roles: [
                    "pod-viewer",
                    "pod-manager",
                    "ingress-viewer",
                    "ingress-controller-viewer",
                ]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            }],
        }
    }
}
