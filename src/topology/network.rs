//! The topology aggregate.
//!
//! A [`Topology`] holds one generated fleet: its nodes in creation order,
//! the armada exported beside it, and the channel id allocator and
//! adjacency registry every channel goes through.
//!
//! Two random sources are kept apart. Topology choices (mesh pairs,
//! capacities, push amounts) come from a seeded RNG so a given seed
//! reproduces the same channel graph. Secret material (the signet key,
//! node root keys, RPC passwords) comes from a separate entropy source,
//! the OS generator unless one is injected, so publishing a seed never
//! exposes a key.

use log::{debug, info};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::types::{Chain, TopologyError};
use crate::channel::{AdjacencyRegistry, Channel, ChannelId, ChannelIdAllocator};
use crate::credentials::{descriptor_import, BootstrapProvider, ChainBootstrap, CredentialProvider};
use crate::node::{Credential, Node, RenderContext, Role};

/// Name of the block-producing node
pub const MINER_NAME: &str = "miner";
/// How armada nodes, deployed in their own namespace, reach the miner
pub const MINER_CROSS_NAMESPACE: &str = "miner.default";

/// Secrets drawn for a node before its credential is issued
struct NodeSeed {
    name: String,
    role: Role,
    root_key: [u8; 32],
    rpc_password: String,
}

pub struct Topology {
    pub(super) name: String,
    pub(super) chain: Chain,
    pub(super) nodes: Vec<Node>,
    pub(super) armada: Vec<Node>,
    pub(super) index_by_name: HashMap<String, usize>,
    pub(super) allocator: ChannelIdAllocator,
    pub(super) registry: AdjacencyRegistry,
    pub(super) rng: StdRng,
    pub(super) miner: Option<usize>,
    entropy: Box<dyn RngCore + Send>,
    bootstrap: ChainBootstrap,
    descriptor_import: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Topology {
    /// Create an empty topology whose secrets come from the OS generator
    pub fn new(
        name: impl Into<String>,
        chain: Chain,
        seed: u64,
        credentials: Arc<dyn CredentialProvider>,
        bootstrap: &dyn BootstrapProvider,
    ) -> Result<Self, TopologyError> {
        Self::with_entropy(name, chain, seed, Box::new(OsRng), credentials, bootstrap)
    }

    /// Create an empty topology drawing secrets from `entropy`.
    ///
    /// `seed` drives topology choices only. The signet bootstrap secret is
    /// the first value taken from `entropy`.
    pub fn with_entropy(
        name: impl Into<String>,
        chain: Chain,
        seed: u64,
        mut entropy: Box<dyn RngCore + Send>,
        credentials: Arc<dyn CredentialProvider>,
        bootstrap: &dyn BootstrapProvider,
    ) -> Result<Self, TopologyError> {
        let name = name.into();
        info!("Creating topology {} on {}", name, chain.as_str());

        let mut secret = [0u8; 32];
        entropy.fill_bytes(&mut secret);
        let chain_bootstrap = bootstrap.bootstrap(&secret)?;
        let descriptor_import = descriptor_import(&chain_bootstrap.descriptor);

        Ok(Topology {
            name,
            chain,
            nodes: Vec::new(),
            armada: Vec::new(),
            index_by_name: HashMap::new(),
            allocator: ChannelIdAllocator::new(),
            registry: AdjacencyRegistry::new(),
            rng: StdRng::seed_from_u64(seed),
            miner: None,
            entropy,
            bootstrap: chain_bootstrap,
            descriptor_import,
            credentials,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Nodes of the main fleet, in creation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn armada(&self) -> &[Node] {
        &self.armada
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index_by_name.get(name).map(|&i| &self.nodes[i])
    }

    pub fn miner(&self) -> Option<&Node> {
        self.miner.map(|i| &self.nodes[i])
    }

    pub fn allocator(&self) -> &ChannelIdAllocator {
        &self.allocator
    }

    pub fn registry(&self) -> &AdjacencyRegistry {
        &self.registry
    }

    pub fn channel_count(&self) -> usize {
        self.registry.total()
    }

    /// Every channel in the fleet with the name of its source node
    pub fn channels(&self) -> impl Iterator<Item = (&str, &Channel)> {
        self.nodes
            .iter()
            .flat_map(|node| node.channels.iter().map(move |c| (node.name.as_str(), c)))
    }

    /// Values shared by every node manifest of this topology
    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            chain: self.chain,
            signet_challenge: match self.chain {
                Chain::Signet => Some(self.bootstrap.challenge.as_str()),
                Chain::Regtest => None,
            },
            descriptor_import: &self.descriptor_import,
        }
    }

    /// Draw secrets for each requested node in order, then issue
    /// credentials for the whole batch in parallel.
    pub(super) fn spawn_nodes(&mut self, requests: Vec<(String, Role)>) -> Result<Vec<Node>, TopologyError> {
        let seeds: Vec<NodeSeed> = requests
            .into_iter()
            .map(|(name, role)| {
                let mut root_key = [0u8; 32];
                self.entropy.fill_bytes(&mut root_key);
                let mut password = [0u8; 16];
                self.entropy.fill_bytes(&mut password);
                NodeSeed {
                    name,
                    role,
                    root_key,
                    rpc_password: hex::encode(password),
                }
            })
            .collect();

        let provider = Arc::clone(&self.credentials);
        let nodes = seeds
            .into_par_iter()
            .map(|seed| -> Result<Node, TopologyError> {
                let admin_macaroon = provider.issue(&seed.name, &seed.root_key)?;
                let credential = Credential {
                    root_key: seed.root_key,
                    admin_macaroon,
                };
                Ok(Node::new(seed.name, seed.role, credential, seed.rpc_password))
            })
            .collect::<Result<Vec<_>, TopologyError>>()?;
        Ok(nodes)
    }

    pub(super) fn spawn_node(&mut self, name: String, role: Role) -> Result<Node, TopologyError> {
        let mut nodes = self.spawn_nodes(vec![(name, role)])?;
        Ok(nodes.remove(0))
    }

    /// Append a node to the main fleet, returning its index
    pub fn push_node(&mut self, node: Node) -> Result<usize, TopologyError> {
        if self.index_by_name.contains_key(&node.name) {
            return Err(TopologyError::DuplicateNode(node.name));
        }
        let index = self.nodes.len();
        debug!("Adding node {} ({})", node.name, node.role.as_str());
        self.index_by_name.insert(node.name.clone(), index);
        self.nodes.push(node);
        Ok(index)
    }

    /// Add `count` plain nodes named after their position in the fleet
    pub fn add_nodes(&mut self, count: usize) -> Result<(), TopologyError> {
        info!("Adding {} nodes to {}", count, self.name);
        let start = self.nodes.len();
        let requests = (start..start + count)
            .map(|i| (format!("tank-{:04}", i), Role::Plain))
            .collect();
        for node in self.spawn_nodes(requests)? {
            self.push_node(node)?;
        }
        Ok(())
    }

    /// Open a channel between two existing nodes by name
    pub fn add_channel(
        &mut self,
        source: &str,
        target: &str,
        capacity: u64,
        push_amt: Option<u64>,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> Result<ChannelId, TopologyError> {
        let src = *self
            .index_by_name
            .get(source)
            .ok_or_else(|| TopologyError::UnknownNode(source.to_string()))?;
        let tgt = *self
            .index_by_name
            .get(target)
            .ok_or_else(|| TopologyError::UnknownNode(target.to_string()))?;
        Ok(self.open_channel(src, tgt, capacity, push_amt, extra))
    }

    /// Allocate an id, register the edge and attach the channel to its source
    pub(super) fn open_channel(
        &mut self,
        src: usize,
        tgt: usize,
        capacity: u64,
        push_amt: Option<u64>,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> ChannelId {
        let id = self.allocator.next_id();
        let target_name = self.nodes[tgt].name.clone();
        let target = self.nodes[tgt].ln_name();
        let source = &mut self.nodes[src];
        info!(" adding channel {}: {}->{} {} sats", id, source.name, target_name, capacity);

        self.registry.register(&source.name, &target_name);
        source.channels.push(Channel {
            id,
            target,
            capacity,
            push_amt,
            extra,
        });
        id
    }

    /// Add the miner and make it an explicit peer of every existing node.
    ///
    /// Run after all other nodes of the main fleet are created; nodes added
    /// later will not peer with the miner.
    pub fn add_miner(&mut self) -> Result<(), TopologyError> {
        if self.miner.is_some() {
            return Err(TopologyError::MinerExists);
        }
        let miner = self.spawn_node(MINER_NAME.to_string(), Role::Miner)?;
        for node in &mut self.nodes {
            node.addnode.push(MINER_NAME.to_string());
        }
        let index = self.push_node(miner)?;
        self.miner = Some(index);
        info!("Added miner to {} ({} peers)", self.name, index);
        Ok(())
    }

    /// Add `count` persistent nodes peered only to the miner.
    ///
    /// Armada nodes are exported as their own network document and never
    /// take part in channel generation. The miner must already exist.
    pub fn add_armada(&mut self, count: usize) -> Result<(), TopologyError> {
        if self.miner.is_none() {
            return Err(TopologyError::MissingMiner);
        }
        info!("Adding {} armada nodes to {}", count, self.name);
        let start = self.armada.len();
        let requests = (start + 1..=start + count)
            .map(|i| (format!("armada-{}", i), Role::Persistent))
            .collect();
        for mut node in self.spawn_nodes(requests)? {
            node.addnode.push(MINER_CROSS_NAMESPACE.to_string());
            self.armada.push(node);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topology")
            .field("name", &self.name)
            .field("chain", &self.chain)
            .field("nodes", &self.nodes.len())
            .field("armada", &self.armada.len())
            .field("channels", &self.registry.total())
            .field("next_channel_id", &self.allocator.peek())
            .finish()
    }
}
