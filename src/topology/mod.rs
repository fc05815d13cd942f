//! Network topology module.
//!
//! This module owns the topology aggregate and the two channel generation
//! modes layered over it: structured team payment routes and the
//! constrained random mesh.

pub mod types;
pub mod network;
pub mod routes;
pub mod mesh;

// Re-export key types for easier access
pub use types::{Chain, Team, TopologyError, COLORS, TEAMS};
pub use network::Topology;
pub use routes::{RouteOptions, ROUTE_CAPACITY};
pub use mesh::{MeshError, MeshOptions};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Chain, Topology};
    use crate::credentials::{StaticBootstrap, StaticCredentials};
    use std::sync::Arc;

    pub(crate) fn topology(chain: Chain, seed: u64) -> Topology {
        Topology::new(
            "test",
            chain,
            seed,
            Arc::new(StaticCredentials::new("0201")),
            &StaticBootstrap::new("0014abcd", "combo(cKey)#chk"),
        )
        .unwrap()
    }
}
