//! Fleet generation orchestrator.
//!
//! This module coordinates the overall generation process, driving each
//! configured network from an empty topology through route and mesh
//! construction to exported documents.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{FleetConfig, NetworkConfig};
use crate::config_loader::{bootstrap_provider, credential_provider};
use crate::credentials::{BootstrapProvider, CredentialProvider};
use crate::fleet::FleetWriter;
use crate::topology::Topology;

/// What was generated for one network
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSummary {
    pub name: String,
    pub seed: u64,
    pub nodes: usize,
    pub channels: usize,
    pub teams: usize,
    pub armada: usize,
    pub files: Vec<PathBuf>,
}

/// Build every network in `config` and write its documents below `output_root`
pub fn generate_fleet(config: &FleetConfig, output_root: &Path) -> Result<Vec<FleetSummary>> {
    let credentials = credential_provider(&config.credentials);
    let bootstrap = bootstrap_provider(&config.bootstrap);
    let writer = FleetWriter::new(output_root);

    let mut summaries = Vec::with_capacity(config.networks.len());
    for network in &config.networks {
        let seed = config.seed_for(network).unwrap_or_else(|| {
            let seed = rand::random();
            info!("No seed configured for {}; using {}", network.name, seed);
            seed
        });
        let summary = generate_network(network, seed, Arc::clone(&credentials), bootstrap.as_ref(), &writer)
            .wrap_err_with(|| format!("Failed to generate network '{}'", network.name))?;
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Build one network and write it.
///
/// Nodes are created in a fixed order: team routes, the general pool, the
/// random mesh over both, then the miner (so every earlier node peers with
/// it) and finally the armada.
pub fn generate_network(
    network: &NetworkConfig,
    seed: u64,
    credentials: Arc<dyn CredentialProvider>,
    bootstrap: &dyn BootstrapProvider,
    writer: &FleetWriter,
) -> Result<FleetSummary> {
    let topology = build_topology(network, seed, credentials, bootstrap)?;

    let mut files = writer.write(&topology)?;
    if network.armies {
        files.extend(writer.write_teams(&network.name, network.teams)?);
    }

    let summary = FleetSummary {
        name: network.name.clone(),
        seed,
        nodes: topology.nodes().len(),
        channels: topology.channel_count(),
        teams: network.teams,
        armada: topology.armada().len(),
        files,
    };
    info!(
        "Generated {}: {} nodes, {} channels, {} teams, {} armada nodes (seed {})",
        summary.name, summary.nodes, summary.channels, summary.teams, summary.armada, summary.seed
    );
    Ok(summary)
}

/// Populate a topology from its network configuration without writing it
pub fn build_topology(
    network: &NetworkConfig,
    seed: u64,
    credentials: Arc<dyn CredentialProvider>,
    bootstrap: &dyn BootstrapProvider,
) -> Result<Topology> {
    let mut topology = Topology::new(network.name.clone(), network.chain, seed, credentials, bootstrap)?;
    topology.add_payment_routes(network.teams, network.route_options())?;
    topology.add_nodes(network.nodes)?;
    let draws = topology.add_random_channels(network.random_channels, &network.mesh_options())?;
    if network.random_channels > 0 {
        info!("Placed {} random channels in {} draws", network.random_channels, draws);
    }
    topology.add_miner()?;
    if network.armada > 0 {
        topology.add_armada(network.armada)?;
    }
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{StaticBootstrap, StaticCredentials};
    use tempfile::TempDir;

    fn network(yaml: &str) -> NetworkConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_build_topology_order() {
        let net = network("name: regtest4\nchain: regtest\nteams: 1\nnodes: 2\nrandom_channels: 3\narmada: 2");
        let topo = build_topology(
            &net,
            5,
            Arc::new(StaticCredentials::new("t")),
            &StaticBootstrap::new("00", "combo(k)"),
        )
        .unwrap();

        let names: Vec<_> = topo.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "aries-spender",
                "aries-router",
                "aries-recipient",
                "aries-gossip-vuln",
                "aries-onion-vuln",
                "tank-0005",
                "tank-0006",
                "miner"
            ]
        );
        assert_eq!(topo.channel_count(), 5);
        assert_eq!(topo.armada().len(), 2);
        assert!(topo.nodes()[..7].iter().all(|n| n.addnode == vec!["miner".to_string()]));
    }

    #[test]
    fn test_generate_network_summary() {
        let out = TempDir::new().unwrap();
        let net = network("name: regtest4\nchain: regtest\nteams: 1\nnodes: 2\nrandom_channels: 3");
        let summary = generate_network(
            &net,
            5,
            Arc::new(StaticCredentials::new("t")),
            &StaticBootstrap::new("00", "combo(k)"),
            &FleetWriter::new(out.path()),
        )
        .unwrap();

        assert_eq!(summary.nodes, 8);
        assert_eq!(summary.channels, 5);
        assert_eq!(summary.armada, 0);
        // battlefield pair plus armies pair
        assert_eq!(summary.files.len(), 4);
    }
}
