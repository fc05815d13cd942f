//! Structured team payment routes.
//!
//! Each team gets a fixed spender -> router -> recipient chain funded
//! entirely on the opening side, optionally mirrored by a second chain
//! protected by admission control, and optionally joined by a pair of
//! vulnerable nodes for the team to defend or attack.

use log::info;
use std::collections::BTreeMap;

use super::network::Topology;
use super::types::{Team, TopologyError};
use crate::node::{Capability, Role};

/// Capacity of every structured route channel, in satoshis
pub const ROUTE_CAPACITY: u64 = 200_000_000;

/// Variants added alongside each team's base route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Duplicate the route with admission control on every hop
    pub admission_control: bool,
    /// Add a gossip-vulnerable and an onion-vulnerable node per team
    pub adversaries: bool,
}

impl Topology {
    /// Add payment routes for the first `count` teams
    pub fn add_payment_routes(&mut self, count: usize, options: RouteOptions) -> Result<(), TopologyError> {
        for team in Team::first(count)? {
            info!("Adding payment route for team {}", team.label);
            self.add_route(&team, "", &[])?;
            if options.admission_control {
                self.add_route(&team, "cb-", &[Capability::AdmissionControl])?;
            }
            if options.adversaries {
                let requests = vec![
                    (format!("{}-gossip-vuln", team.label), Role::GossipAdversary),
                    (format!("{}-onion-vuln", team.label), Role::OnionAdversary),
                ];
                for node in self.spawn_nodes(requests)? {
                    self.push_node(node.with_color(team.color))?;
                }
            }
        }
        Ok(())
    }

    fn add_route(&mut self, team: &Team, infix: &str, extra: &[Capability]) -> Result<(), TopologyError> {
        let requests = vec![
            (format!("{}-{}spender", team.label, infix), Role::PaymentSource),
            (format!("{}-{}router", team.label, infix), Role::PaymentRouter),
            (format!("{}-{}recipient", team.label, infix), Role::PaymentSink),
        ];
        let mut hops = Vec::with_capacity(3);
        for node in self.spawn_nodes(requests)? {
            let node = extra
                .iter()
                .cloned()
                .fold(node.with_color(team.color), |node, capability| node.with_capability(capability));
            hops.push(self.push_node(node)?);
        }
        for pair in hops.windows(2) {
            self.open_channel(pair[0], pair[1], ROUTE_CAPACITY, Some(0), BTreeMap::new());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::topology::test_support::topology;
    use crate::topology::Chain;

    #[test]
    fn test_single_team_route() {
        let mut topo = topology(Chain::Regtest, 7);
        topo.add_payment_routes(1, RouteOptions::default()).unwrap();

        let names: Vec<_> = topo.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["aries-spender", "aries-router", "aries-recipient"]);
        assert_eq!(topo.channel_count(), 2);

        let channels: Vec<_> = topo.channels().collect();
        assert_eq!(channels[0].0, "aries-spender");
        assert_eq!(channels[0].1.id, ChannelId::new(500, 1));
        assert_eq!(channels[0].1.target, "aries-router-ln");
        assert_eq!(channels[1].0, "aries-router");
        assert_eq!(channels[1].1.id, ChannelId::new(500, 2));
        assert_eq!(channels[1].1.target, "aries-recipient-ln");
        for (_, channel) in channels {
            assert_eq!(channel.capacity, ROUTE_CAPACITY);
            assert_eq!(channel.push_amt, Some(0));
        }
    }

    #[test]
    fn test_roles_and_colors() {
        let mut topo = topology(Chain::Regtest, 7);
        topo.add_payment_routes(2, RouteOptions::default()).unwrap();

        assert_eq!(topo.node("taurus-spender").unwrap().role, Role::PaymentSource);
        assert_eq!(topo.node("taurus-router").unwrap().role, Role::PaymentRouter);
        assert_eq!(topo.node("taurus-recipient").unwrap().role, Role::PaymentSink);
        assert_eq!(topo.node("taurus-router").unwrap().color, "#3cb44b");
        assert_eq!(topo.node("aries-router").unwrap().color, "#e6194b");
    }

    #[test]
    fn test_adversaries_make_five_nodes_per_team() {
        let mut topo = topology(Chain::Regtest, 7);
        let options = RouteOptions { adversaries: true, ..Default::default() };
        topo.add_payment_routes(3, options).unwrap();

        assert_eq!(topo.nodes().len(), 15);
        assert_eq!(topo.channel_count(), 6);
        let vuln = topo.node("gemini-gossip-vuln").unwrap();
        assert_eq!(vuln.role, Role::GossipAdversary);
        assert!(vuln.channels.is_empty());
        assert_eq!(topo.node("gemini-onion-vuln").unwrap().role, Role::OnionAdversary);
    }

    #[test]
    fn test_admission_control_route() {
        let mut topo = topology(Chain::Regtest, 7);
        let options = RouteOptions { admission_control: true, adversaries: false };
        topo.add_payment_routes(1, options).unwrap();

        assert_eq!(topo.nodes().len(), 6);
        assert_eq!(topo.channel_count(), 4);
        let cb_router = topo.node("aries-cb-router").unwrap();
        assert!(cb_router.has_capability(&Capability::AdmissionControl));
        assert!(cb_router.has_capability(&Capability::Metrics(Vec::new())));
        assert!(!topo.node("aries-router").unwrap().has_capability(&Capability::AdmissionControl));
        assert_eq!(
            topo.node("aries-cb-spender").unwrap().channels[0].id,
            ChannelId::new(500, 3)
        );
    }

    #[test]
    fn test_too_many_teams_is_error() {
        let mut topo = topology(Chain::Regtest, 7);
        let result = topo.add_payment_routes(13, RouteOptions::default());
        assert!(matches!(result, Err(TopologyError::TooManyTeams { .. })));
        assert!(topo.nodes().is_empty());
    }
}
