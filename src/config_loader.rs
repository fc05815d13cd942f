use crate::config::{BootstrapConfig, CredentialConfig, FleetConfig};
use crate::credentials::{
    BootstrapProvider, CommandBootstrap, CredentialProvider, LncliBaker, StaticBootstrap,
    StaticCredentials,
};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Load and parse a fleet configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<FleetConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: FleetConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    info!("Loaded {} network definition(s)", config.networks.len());

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub seed: Option<u64>,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut FleetConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(seed) = overrides.seed {
        info!("Overriding seed with {} for all networks", seed);
        config.general.seed = Some(seed);
        for network in &mut config.networks {
            if network.seed.take().is_some() {
                warn!("Ignoring per-network seed of '{}' in favour of --seed", network.name);
            }
        }
    }

    config.validate()?;

    Ok(())
}

/// Build the credential provider the configuration asks for
pub fn credential_provider(config: &CredentialConfig) -> Arc<dyn CredentialProvider> {
    match config {
        CredentialConfig::Lncli { program } => Arc::new(LncliBaker::new(program.clone())),
        CredentialConfig::Static { token } => {
            warn!("Using a static admin credential for every node");
            Arc::new(StaticCredentials::new(token.clone()))
        }
    }
}

/// Build the bootstrap provider the configuration asks for
pub fn bootstrap_provider(config: &BootstrapConfig) -> Box<dyn BootstrapProvider> {
    match config {
        BootstrapConfig::Command { program, args } => {
            Box::new(CommandBootstrap::new(program.clone(), args.clone()))
        }
        BootstrapConfig::Static { challenge, descriptor } => {
            Box::new(StaticBootstrap::new(challenge.clone(), descriptor.clone()))
        }
    }
}
