//! Node type definitions.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::mem;

use super::capability::{Capability, RenderContext};
use super::manifest::Manifest;
use super::role::Role;
use crate::channel::Channel;
use crate::topology::Chain;

/// Runtime color for nodes outside any team
pub const DEFAULT_COLOR: &str = "#3399FF";

/// Container image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub tag: String,
}

impl Image {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

/// Authorization material for a node's payment runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Root key the admin token was baked from
    pub root_key: [u8; 32],
    /// Opaque admin token issued by the credential provider
    pub admin_macaroon: String,
}

impl Credential {
    pub fn root_key_base64(&self) -> String {
        BASE64.encode(self.root_key)
    }
}

/// A simulated node: chain daemon plus payment runtime.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub role: Role,
    pub chain_image: Image,
    pub ln_image: Image,
    pub rpc_password: String,
    /// Explicit transport-layer peers
    pub addnode: Vec<String>,
    pub credential: Credential,
    pub color: String,
    /// Channels opened by this node
    pub channels: Vec<Channel>,
    capabilities: Vec<Capability>,
}

impl Node {
    /// Create a node with the image pins and capability stack of `role`
    pub fn new(name: impl Into<String>, role: Role, credential: Credential, rpc_password: String) -> Self {
        Node {
            name: name.into(),
            role,
            chain_image: Image::tag(role.chain_image()),
            ln_image: Image::tag(role.ln_image()),
            rpc_password,
            addnode: Vec::new(),
            credential,
            color: DEFAULT_COLOR.to_string(),
            channels: Vec::new(),
            capabilities: role.capabilities(),
        }
    }

    /// Stack another capability on top of the existing ones
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Whether a capability of the same kind as `capability` is applied.
    ///
    /// Payloads are ignored, so any `Metrics` matches any other.
    pub fn has_capability(&self, capability: &Capability) -> bool {
        let kind = mem::discriminant(capability);
        self.capabilities.iter().any(|c| mem::discriminant(c) == kind)
    }

    /// Service name of this node's payment runtime
    pub fn ln_name(&self) -> String {
        format!("{}-ln", self.name)
    }

    /// Chain daemon config lines, newline separated
    fn chain_config(&self, ctx: &RenderContext<'_>) -> String {
        let mut lines = vec![
            "maxconnections=1000".to_string(),
            format!("uacomment={}", self.name),
        ];
        if ctx.chain == Chain::Signet {
            if let Some(challenge) = ctx.signet_challenge {
                lines.push(format!("signetchallenge={}", challenge));
            }
        }
        lines.push("coinstatsindex=1".to_string());
        lines.join("\n")
    }

    /// Attributes every node exports before any capability is applied
    pub fn base_manifest(&self, ctx: &RenderContext<'_>) -> Manifest {
        let mut lnd = json!({
            "image": self.ln_image,
            "macaroonRootKey": self.credential.root_key_base64(),
            "adminMacaroon": self.credential.admin_macaroon,
            "config": format!("color={}", self.color),
        });
        if !self.channels.is_empty() {
            lnd["channels"] = json!(self.channels);
        }
        Manifest::from(json!({
            "name": self.name,
            "image": self.chain_image,
            "global": {
                "rpcpassword": self.rpc_password,
                "chain": ctx.chain.as_str(),
            },
            "config": self.chain_config(ctx),
            "addnode": self.addnode,
            "ln": {"lnd": true},
            "lnd": lnd,
        }))
    }

    /// Full manifest: base attributes with every capability's layers
    /// applied in order, later writes overriding earlier ones
    pub fn manifest(&self, ctx: &RenderContext<'_>) -> Manifest {
        self.capabilities
            .iter()
            .fold(self.base_manifest(ctx), |manifest, capability| {
                manifest.layered(&capability.layers(ctx))
            })
    }
}
