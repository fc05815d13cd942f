use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::topology::mesh::{DEFAULT_CAPACITY_MAX, DEFAULT_CAPACITY_MIN, DEFAULT_MAX_DRAWS};
use crate::topology::{Chain, MeshOptions, RouteOptions, TEAMS};
use crate::utils::validation::validate_dns_label;

/// Top-level fleet configuration that mirrors the YAML file
#[derive(Debug, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub credentials: CredentialConfig,
    pub bootstrap: BootstrapConfig,
    pub networks: Vec<NetworkConfig>,
}

impl FleetConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.networks.is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "at least one network must be defined".to_string(),
            ));
        }

        if let CredentialConfig::Static { token } = &self.credentials {
            if token.is_empty() {
                return Err(ValidationError::InvalidCredentials(
                    "static token cannot be empty".to_string(),
                ));
            }
        }

        if let BootstrapConfig::Command { program, .. } = &self.bootstrap {
            if program.is_empty() {
                return Err(ValidationError::InvalidBootstrap(
                    "bootstrap program cannot be empty".to_string(),
                ));
            }
        }

        let mut names = HashSet::new();
        for network in &self.networks {
            if !names.insert(network.name.as_str()) {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network name '{}' is used more than once",
                    network.name
                )));
            }
            network.validate()?;
        }

        Ok(())
    }

    /// Seed for `network`: its own, else the global one
    pub fn seed_for(&self, network: &NetworkConfig) -> Option<u64> {
        network.seed.or(self.general.seed)
    }
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeneralConfig {
    /// Seed for every random choice; a random seed is drawn and logged if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Where node admin tokens come from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum CredentialConfig {
    /// Bake tokens with `lncli bakemacaroon`
    Lncli {
        #[serde(default = "default_lncli")]
        program: String,
    },
    /// Use one fixed token for every node
    Static { token: String },
}

impl Default for CredentialConfig {
    fn default() -> Self {
        CredentialConfig::Lncli {
            program: default_lncli(),
        }
    }
}

fn default_lncli() -> String {
    "lncli".to_string()
}

/// Where the signet challenge and miner descriptor come from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum BootstrapConfig {
    /// External helper receiving the secret as its last argument
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Fixed values
    Static { challenge: String, descriptor: String },
}

/// Inclusive capacity range in satoshis
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CapacityRange {
    pub min: u64,
    pub max: u64,
}

impl Default for CapacityRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_CAPACITY_MIN,
            max: DEFAULT_CAPACITY_MAX,
        }
    }
}

/// One generated network
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    pub name: String,
    #[serde(default)]
    pub chain: Chain,
    /// Number of teams with a structured payment route
    #[serde(default)]
    pub teams: usize,
    /// Add a second route per team protected by admission control
    #[serde(default)]
    pub admission_control: bool,
    /// Add the gossip and onion adversary nodes per team
    #[serde(default = "default_true")]
    pub adversaries: bool,
    /// Plain nodes in the general pool
    #[serde(default)]
    pub nodes: usize,
    #[serde(default)]
    pub random_channels: usize,
    #[serde(default)]
    pub channel_capacity: CapacityRange,
    #[serde(default = "default_max_draws")]
    pub max_draws: u64,
    /// Persistent nodes exported as a separate armada network
    #[serde(default)]
    pub armada: usize,
    /// Also write the team namespace documents
    #[serde(default = "default_true")]
    pub armies: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_max_draws() -> u64 {
    DEFAULT_MAX_DRAWS
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dns_label(&self.name).map_err(ValidationError::InvalidNetwork)?;

        if self.teams > TEAMS.len() {
            return Err(ValidationError::InvalidNetwork(format!(
                "network '{}' requests {} teams but only {} are defined",
                self.name,
                self.teams,
                TEAMS.len()
            )));
        }

        let range = self.channel_capacity;
        if range.min == 0 || range.min > range.max {
            return Err(ValidationError::InvalidChannels(format!(
                "network '{}' has invalid capacity range {}..={}",
                self.name, range.min, range.max
            )));
        }

        if self.max_draws == 0 {
            return Err(ValidationError::InvalidChannels(format!(
                "network '{}' max_draws must be positive",
                self.name
            )));
        }

        let available = self.available_random_pairs().ok_or_else(|| {
            ValidationError::InvalidNetwork(format!(
                "network '{}' has too many nodes ({}) to plan channels for",
                self.name, self.nodes
            ))
        })?;
        if self.random_channels > available {
            return Err(ValidationError::InvalidChannels(format!(
                "network '{}' requests {} random channels but only {} node pairs are available",
                self.name, self.random_channels, available
            )));
        }

        Ok(())
    }

    /// Nodes eligible for random channels: everything but payment sinks
    fn mesh_pool_size(&self) -> Option<usize> {
        let mut per_team = 2;
        if self.admission_control {
            per_team += 2;
        }
        if self.adversaries {
            per_team += 2;
        }
        self.teams.checked_mul(per_team)?.checked_add(self.nodes)
    }

    /// Unordered node pairs the random mesh could still connect, or `None`
    /// if the count does not fit in a `usize`
    pub fn available_random_pairs(&self) -> Option<usize> {
        let pool = self.mesh_pool_size()?;
        let routes = if self.admission_control { 2 } else { 1 };
        let pairs = pool.checked_mul(pool.saturating_sub(1))? / 2;
        // spender->router edges already occupy one eligible pair per route
        Some(pairs.saturating_sub(self.teams.saturating_mul(routes)))
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            admission_control: self.admission_control,
            adversaries: self.adversaries,
        }
    }

    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            capacity_min: self.channel_capacity.min,
            capacity_max: self.channel_capacity.max,
            max_draws: self.max_draws,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid channel configuration: {0}")]
    InvalidChannels(String),
    #[error("Invalid credential configuration: {0}")]
    InvalidCredentials(String),
    #[error("Invalid bootstrap configuration: {0}")]
    InvalidBootstrap(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(yaml: &str) -> NetworkConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_network_defaults() {
        let net = network("name: regtest4");
        assert_eq!(net.chain, Chain::Signet);
        assert!(net.adversaries);
        assert!(net.armies);
        assert!(!net.admission_control);
        assert_eq!(net.channel_capacity, CapacityRange::default());
        assert_eq!(net.max_draws, DEFAULT_MAX_DRAWS);
        assert!(net.validate().is_ok());
    }

    #[test]
    fn test_available_pairs() {
        // 1 team with adversaries: spender, router, 2 vulns + 2 tanks = 6 eligible
        let net = network("name: regtest4\nteams: 1\nnodes: 2\nrandom_channels: 3");
        assert_eq!(net.available_random_pairs(), Some(15 - 1));
        assert!(net.validate().is_ok());

        let dense = network("name: tiny\nnodes: 3\nadversaries: false\nrandom_channels: 4");
        assert_eq!(dense.available_random_pairs(), Some(3));
        assert!(matches!(dense.validate(), Err(ValidationError::InvalidChannels(_))));
    }

    #[test]
    fn test_huge_node_count_rejected() {
        let net = network(&format!("name: huge\nnodes: {}\nrandom_channels: 1", usize::MAX / 2));
        assert_eq!(net.available_random_pairs(), None);
        assert!(matches!(net.validate(), Err(ValidationError::InvalidNetwork(_))));

        let overflow_add = network(&format!("name: huge\nteams: 1\nnodes: {}", usize::MAX));
        assert_eq!(overflow_add.available_random_pairs(), None);
        assert!(overflow_add.validate().is_err());
    }

    #[test]
    fn test_invalid_names_and_teams() {
        assert!(network("name: Bad_Name").validate().is_err());
        assert!(network("name: ok\nteams: 13").validate().is_err());
    }

    #[test]
    fn test_invalid_capacity_range() {
        let net = network("name: ok\nchannel_capacity: {min: 10, max: 5}");
        assert!(matches!(net.validate(), Err(ValidationError::InvalidChannels(_))));
    }

    #[test]
    fn test_provider_tags() {
        let creds: CredentialConfig = serde_yaml::from_str("provider: lncli").unwrap();
        assert_eq!(creds, CredentialConfig::default());

        let boot: BootstrapConfig =
            serde_yaml::from_str("provider: command\nprogram: ./keys.py").unwrap();
        assert_eq!(
            boot,
            BootstrapConfig::Command {
                program: "./keys.py".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_duplicate_network_names() {
        let config: FleetConfig = serde_yaml::from_str(
            r#"
bootstrap:
  provider: static
  challenge: "0014aa"
  descriptor: "combo(k)"
networks:
  - name: dup
  - name: dup
"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));
    }
}
