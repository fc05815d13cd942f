//! Channel type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Short channel identifier modelled on a funding transaction's position
/// in the chain: the block height and the transaction index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId {
    pub block: u64,
    pub index: u32,
}

impl ChannelId {
    pub fn new(block: u64, index: u32) -> Self {
        Self { block, index }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.block, self.index)
    }
}

/// A channel owned by its source node.
///
/// Serialized as one entry of the owning node's channel list, e.g.
///
/// ```yaml
/// - id:
///     block: 500
///     index: 1
///   target: aries-router-ln
///   capacity: 200000000
///   push_amt: 0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    /// Runtime service name of the remote end (`<node>-ln`)
    pub target: String,
    /// Capacity in satoshis
    pub capacity: u64,
    /// Amount pushed to the remote side at open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_amt: Option<u64>,
    /// Additional attributes passed through to the deployment verbatim
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Channel {
    /// Name of the target node, without the runtime service suffix.
    pub fn target_node(&self) -> &str {
        self.target.strip_suffix("-ln").unwrap_or(&self.target)
    }
}
