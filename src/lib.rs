//! # Warfleet - Topology generator for simulated Lightning Network wargames
//!
//! This library builds the topology of a payment-channel network used for
//! adversarial exercises: teams of payment nodes, vulnerable targets, a
//! randomized channel mesh, a miner, and auxiliary groupings. The result is
//! written as declarative network documents for the deployment tooling.
//!
//! ## Architecture
//!
//! - `node`: node model; base attributes plus stackable capabilities
//! - `channel`: channel id allocation and adjacency tracking
//! - `topology`: the topology aggregate, team routes and the random mesh
//! - `fleet`: export documents and the writer
//! - `credentials`: admin token and chain bootstrap collaborators
//! - `config` / `config_loader`: YAML fleet configuration
//! - `orchestrator`: drives each configured network end to end
//! - `utils`: shared validation helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warfleet::credentials::{StaticBootstrap, StaticCredentials};
//! use warfleet::fleet::FleetWriter;
//! use warfleet::topology::{Chain, MeshOptions, RouteOptions, Topology};
//!
//! let mut topology = Topology::new(
//!     "regtest4",
//!     Chain::Regtest,
//!     42,
//!     Arc::new(StaticCredentials::new("0201")),
//!     &StaticBootstrap::new("0014ab", "combo(key)#checksum"),
//! )?;
//! topology.add_payment_routes(1, RouteOptions::default())?;
//! topology.add_nodes(2)?;
//! topology.add_random_channels(3, &MeshOptions::default())?;
//! topology.add_miner()?;
//!
//! FleetWriter::new("output").write(&topology)?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! Generation steps return typed errors (`TopologyError`, `MeshError`,
//! `ValidationError`); orchestration and file output use `color_eyre` for
//! reporting with context.

pub mod channel;
pub mod config;
pub mod config_loader;
pub mod credentials;
pub mod fleet;
pub mod node;
pub mod orchestrator;
pub mod topology;
pub mod utils;
