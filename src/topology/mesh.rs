//! Constrained random channel mesh.
//!
//! Channels are drawn between uniformly chosen node pairs, rejecting
//! self-loops, payment sinks and any pair that already shares a channel in
//! either direction. Rejected draws do not count towards the requested
//! number of channels.

use log::{debug, info};
use rand::Rng;
use std::collections::BTreeMap;

use super::network::Topology;

pub const DEFAULT_CAPACITY_MIN: u64 = 1_000_000;
pub const DEFAULT_CAPACITY_MAX: u64 = 10_000_000;
pub const DEFAULT_MAX_DRAWS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshOptions {
    /// Smallest channel capacity drawn, inclusive
    pub capacity_min: u64,
    /// Largest channel capacity drawn, inclusive
    pub capacity_max: u64,
    /// Upper bound on pair draws, accepted or rejected
    pub max_draws: u64,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            capacity_min: DEFAULT_CAPACITY_MIN,
            capacity_max: DEFAULT_CAPACITY_MAX,
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("Invalid capacity range {min}..={max}")]
    InvalidCapacityRange { min: u64, max: u64 },

    #[error("Need at least two nodes to add channels, have {nodes}")]
    PoolTooSmall { nodes: usize },

    #[error("Gave up after {draws} draws: created {created} of {requested} random channels")]
    Exhausted {
        requested: usize,
        created: usize,
        draws: u64,
    },
}

impl Topology {
    /// Add `count` random channels between existing nodes.
    ///
    /// Returns the number of draws it took.
    pub fn add_random_channels(&mut self, count: usize, options: &MeshOptions) -> Result<u64, MeshError> {
        if count == 0 {
            return Ok(0);
        }
        if options.capacity_min == 0 || options.capacity_min > options.capacity_max {
            return Err(MeshError::InvalidCapacityRange {
                min: options.capacity_min,
                max: options.capacity_max,
            });
        }
        let pool = self.nodes.len();
        if pool < 2 {
            return Err(MeshError::PoolTooSmall { nodes: pool });
        }

        info!("Adding {} random channels to {}", count, self.name);
        let mut remaining = count;
        let mut draws = 0u64;
        while remaining > 0 {
            if draws >= options.max_draws {
                return Err(MeshError::Exhausted {
                    requested: count,
                    created: count - remaining,
                    draws,
                });
            }
            draws += 1;

            let src = self.rng.gen_range(0..pool);
            let tgt = self.rng.gen_range(0..pool);
            if src == tgt {
                debug!(" avoiding self-connect");
                continue;
            }

            let (source, target) = (&self.nodes[src], &self.nodes[tgt]);
            // Sinks keep their balances predictable for scoring
            if source.role.is_payment_sink() || target.role.is_payment_sink() {
                debug!(" not getting involved with recipient nodes");
                continue;
            }
            if self.registry.has_edge(&source.name, &target.name) {
                debug!(" avoiding duplicate {}->{}", source.name, target.name);
                continue;
            }
            if self.registry.has_edge(&target.name, &source.name) {
                debug!(" avoiding reverse {}->{}", source.name, target.name);
                continue;
            }

            let capacity = self.rng.gen_range(options.capacity_min..=options.capacity_max);
            let push_amt = self.rng.gen_range(capacity / 8..=capacity / 2);
            self.open_channel(src, tgt, capacity, Some(push_amt), BTreeMap::new());
            remaining -= 1;
        }
        Ok(draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::node::Role;
    use crate::topology::test_support::topology;
    use crate::topology::{Chain, RouteOptions};
    use std::collections::HashSet;

    fn edges(topo: &Topology) -> Vec<(String, String, u64, Option<u64>)> {
        topo.channels()
            .map(|(src, c)| (src.to_string(), c.target_node().to_string(), c.capacity, c.push_amt))
            .collect()
    }

    #[test]
    fn test_random_channels_respect_constraints() {
        let mut topo = topology(Chain::Signet, 99);
        topo.add_payment_routes(4, RouteOptions { adversaries: true, ..Default::default() })
            .unwrap();
        topo.add_nodes(20).unwrap();
        let structured = topo.channel_count();
        let first_random = topo.allocator().peek();
        topo.add_random_channels(60, &MeshOptions::default()).unwrap();

        assert_eq!(topo.channel_count(), structured + 60);

        let mut pairs = HashSet::new();
        for (src, tgt, _, _) in edges(&topo) {
            assert_ne!(src, tgt);
            let key = if src < tgt { (src.clone(), tgt.clone()) } else { (tgt.clone(), src.clone()) };
            assert!(pairs.insert(key), "duplicate pair {}-{}", src, tgt);
        }

        // channels() groups by owning node, so pick the mesh channels by id
        let random: Vec<_> = topo.channels().filter(|(_, c)| c.id >= first_random).collect();
        assert_eq!(random.len(), 60);
        for (src, channel) in random {
            assert_ne!(channel.push_amt, Some(0));
            let source = topo.node(src).unwrap();
            let target = topo.node(channel.target_node()).unwrap();
            assert_ne!(source.role, Role::PaymentSink);
            assert_ne!(target.role, Role::PaymentSink);
        }
    }

    #[test]
    fn test_capacity_and_push_ranges() {
        let mut topo = topology(Chain::Regtest, 3);
        topo.add_nodes(30).unwrap();
        let options = MeshOptions::default();
        topo.add_random_channels(100, &options).unwrap();

        for (_, _, capacity, push) in edges(&topo) {
            assert!(capacity >= options.capacity_min && capacity <= options.capacity_max);
            let push = push.unwrap();
            assert!(push >= capacity / 8 && push <= capacity / 2, "push {} cap {}", push, capacity);
        }
    }

    #[test]
    fn test_ids_unique_across_modes() {
        let mut topo = topology(Chain::Regtest, 5);
        topo.add_payment_routes(12, RouteOptions::default()).unwrap();
        topo.add_nodes(40).unwrap();
        topo.add_random_channels(200, &MeshOptions::default()).unwrap();

        let ids: Vec<ChannelId> = topo.channels().map(|(_, c)| c.id).collect();
        assert_eq!(ids.len(), 224);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
        assert!(ids.iter().all(|id| id.index >= 1 && id.index <= 200));
        assert_eq!(topo.allocator().peek(), ChannelId::new(501, 25));
    }

    #[test]
    fn test_zero_channels_does_not_advance_allocator() {
        let mut topo = topology(Chain::Regtest, 5);
        topo.add_payment_routes(1, RouteOptions::default()).unwrap();
        let before = topo.allocator().peek();
        assert_eq!(topo.add_random_channels(0, &MeshOptions::default()), Ok(0));
        assert_eq!(topo.allocator().peek(), before);
        assert_eq!(before, ChannelId::new(500, 3));
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let mut topo = topology(Chain::Regtest, 5);
        topo.add_nodes(3).unwrap();
        // Three nodes allow only three unordered pairs
        let options = MeshOptions { max_draws: 10_000, ..Default::default() };
        let err = topo.add_random_channels(4, &options).unwrap_err();
        assert_eq!(
            err,
            MeshError::Exhausted { requested: 4, created: 3, draws: 10_000 }
        );
        assert_eq!(topo.channel_count(), 3);
    }

    #[test]
    fn test_pool_and_range_validation() {
        let mut topo = topology(Chain::Regtest, 5);
        topo.add_nodes(1).unwrap();
        assert_eq!(
            topo.add_random_channels(1, &MeshOptions::default()),
            Err(MeshError::PoolTooSmall { nodes: 1 })
        );
        let bad = MeshOptions { capacity_min: 10, capacity_max: 5, ..Default::default() };
        assert!(matches!(
            topo.add_random_channels(1, &bad),
            Err(MeshError::InvalidCapacityRange { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_mesh() {
        let build = || {
            let mut topo = topology(Chain::Regtest, 1234);
            topo.add_payment_routes(2, RouteOptions::default()).unwrap();
            topo.add_nodes(10).unwrap();
            topo.add_random_channels(15, &MeshOptions::default()).unwrap();
            edges(&topo)
        };
        assert_eq!(build(), build());
    }
}
