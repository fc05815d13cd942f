//! Admin token issuance.
//!
//! The token format is opaque to the generator; a provider only needs to
//! turn a node name and a 32-byte root key into a string the payment
//! runtime will accept.

use log::debug;
use std::process::Command;

/// Permissions baked into every admin token
pub const ADMIN_PERMISSIONS: &[&str] = &[
    "address:read",
    "address:write",
    "info:read",
    "info:write",
    "invoices:read",
    "invoices:write",
    "macaroon:generate",
    "macaroon:read",
    "macaroon:write",
    "message:read",
    "message:write",
    "offchain:read",
    "offchain:write",
    "onchain:read",
    "onchain:write",
    "peers:read",
    "peers:write",
    "signer:generate",
    "signer:read",
];

/// Errors raised while issuing a node credential
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Failed to run '{program}' for node {node}: {source}")]
    Spawn {
        program: String,
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status} for node {node}: {stderr}")]
    Failed {
        program: String,
        node: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Empty credential returned for node {node}")]
    Empty { node: String },
}

/// Issues an admin token for a node given its root key.
///
/// Providers are called from several threads at once when nodes are
/// created in batches.
pub trait CredentialProvider: Send + Sync {
    fn issue(&self, node: &str, root_key: &[u8; 32]) -> Result<String, CredentialError>;
}

/// Bakes tokens with the `lncli bakemacaroon` command.
#[derive(Debug, Clone)]
pub struct LncliBaker {
    program: String,
}

impl LncliBaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn args(root_key: &[u8; 32]) -> Vec<String> {
        let mut args = vec![
            "bakemacaroon".to_string(),
            format!("--root_key={}", hex::encode(root_key)),
        ];
        args.extend(ADMIN_PERMISSIONS.iter().map(|p| p.to_string()));
        args
    }
}

impl Default for LncliBaker {
    fn default() -> Self {
        Self::new("lncli")
    }
}

impl CredentialProvider for LncliBaker {
    fn issue(&self, node: &str, root_key: &[u8; 32]) -> Result<String, CredentialError> {
        debug!("Baking admin macaroon for {}", node);
        let output = Command::new(&self.program)
            .args(Self::args(root_key))
            .output()
            .map_err(|source| CredentialError::Spawn {
                program: self.program.clone(),
                node: node.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CredentialError::Failed {
                program: self.program.clone(),
                node: node.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(CredentialError::Empty { node: node.to_string() });
        }
        Ok(token)
    }
}

/// Returns the same token for every node. Used for offline generation and tests.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl CredentialProvider for StaticCredentials {
    fn issue(&self, node: &str, _root_key: &[u8; 32]) -> Result<String, CredentialError> {
        if self.token.is_empty() {
            return Err(CredentialError::Empty { node: node.to_string() });
        }
        Ok(self.token.clone())
    }
}
