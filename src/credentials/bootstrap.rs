//! Chain bootstrap data for the miner.
//!
//! A signet needs a block-signing challenge and the miner needs a wallet
//! holding the matching key. Deriving both from a secret is delegated to a
//! provider; the generator only embeds the results.

use log::debug;
use serde::Deserialize;
use std::process::Command;

/// Errors raised while obtaining chain bootstrap data
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Failed to run bootstrap helper '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Bootstrap helper '{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Bootstrap helper returned malformed output: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Values derived from the bootstrap secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainBootstrap {
    /// Signet block-signing challenge script, hex encoded
    pub challenge: String,
    /// Checksummed wallet descriptor holding the signing key
    pub descriptor: String,
}

pub trait BootstrapProvider: Send + Sync {
    fn bootstrap(&self, secret: &[u8; 32]) -> Result<ChainBootstrap, BootstrapError>;
}

/// Runs an external helper that receives the secret as a hex argument and
/// prints `{"challenge": ..., "descriptor": ...}` on stdout.
#[derive(Debug, Clone)]
pub struct CommandBootstrap {
    program: String,
    args: Vec<String>,
}

impl CommandBootstrap {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

impl BootstrapProvider for CommandBootstrap {
    fn bootstrap(&self, secret: &[u8; 32]) -> Result<ChainBootstrap, BootstrapError> {
        debug!("Running bootstrap helper {}", self.program);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(hex::encode(secret))
            .output()
            .map_err(|source| BootstrapError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BootstrapError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Fixed bootstrap values, independent of the secret
#[derive(Debug, Clone)]
pub struct StaticBootstrap {
    bootstrap: ChainBootstrap,
}

impl StaticBootstrap {
    pub fn new(challenge: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            bootstrap: ChainBootstrap {
                challenge: challenge.into(),
                descriptor: descriptor.into(),
            },
        }
    }
}

impl BootstrapProvider for StaticBootstrap {
    fn bootstrap(&self, _secret: &[u8; 32]) -> Result<ChainBootstrap, BootstrapError> {
        Ok(self.bootstrap.clone())
    }
}

/// Build the descriptor import document passed to the miner's wallet,
/// escaped for embedding in a `sh -c` command line.
pub fn descriptor_import(descriptor: &str) -> String {
    let import = serde_json::json!([{ "desc": descriptor, "timestamp": 0 }]);
    import
        .to_string()
        .replace('"', "\\\"")
        .replace(' ', "")
        .replace('(', "\\(")
        .replace(')', "\\)")
        .replace(',', "\\,")
}
