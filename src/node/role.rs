//! Named role variants, each an ordered stack of capabilities plus image pins.

use super::capability::{Capability, MetricProbe};

pub const CHAIN_IMAGE: &str = "29.0";
pub const LN_IMAGE: &str = "v0.19.0-beta";
pub const MINER_CHAIN_IMAGE: &str = "29.0-util";
pub const VULNERABLE_CHAIN_IMAGE: &str = "25.1";
pub const GOSSIP_VULNERABLE_LN_IMAGE: &str = "v0.18.2-beta";
pub const ONION_VULNERABLE_LN_IMAGE: &str = "v0.17.5-beta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Plain,
    Metrics,
    /// Start of a team payment route
    PaymentSource,
    /// Middle hop of a team payment route
    PaymentRouter,
    /// End of a team payment route; kept out of the random mesh
    PaymentSink,
    GossipAdversary,
    OnionAdversary,
    /// Long-lived participant with persistent volumes (armada nodes)
    Persistent,
    Miner,
}

impl Role {
    /// Capabilities applied on top of the base node, in order
    pub fn capabilities(&self) -> Vec<Capability> {
        match self {
            Role::Plain => vec![],
            Role::Metrics => vec![Capability::metrics(&[])],
            Role::PaymentSource => vec![Capability::metrics(&[MetricProbe::FailedPayments])],
            Role::PaymentRouter => vec![Capability::metrics(&[MetricProbe::PendingHtlcs])],
            Role::PaymentSink => vec![Capability::metrics(&[MetricProbe::ChannelBalance])],
            Role::GossipAdversary => vec![Capability::GossipAdversary],
            Role::OnionAdversary => vec![Capability::OnionAdversary],
            Role::Persistent => vec![Capability::Persistence],
            Role::Miner => vec![Capability::ChainMiner],
        }
    }

    /// Chain daemon image tag
    pub fn chain_image(&self) -> &'static str {
        match self {
            Role::Miner => MINER_CHAIN_IMAGE,
            Role::GossipAdversary | Role::OnionAdversary => VULNERABLE_CHAIN_IMAGE,
            _ => CHAIN_IMAGE,
        }
    }

    /// Payment runtime image tag
    pub fn ln_image(&self) -> &'static str {
        match self {
            Role::GossipAdversary => GOSSIP_VULNERABLE_LN_IMAGE,
            Role::OnionAdversary => ONION_VULNERABLE_LN_IMAGE,
            _ => LN_IMAGE,
        }
    }

    pub fn is_payment_sink(&self) -> bool {
        matches!(self, Role::PaymentSink)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Plain => "plain",
            Role::Metrics => "metrics",
            Role::PaymentSource => "payment-source",
            Role::PaymentRouter => "payment-router",
            Role::PaymentSink => "payment-sink",
            Role::GossipAdversary => "gossip-adversary",
            Role::OnionAdversary => "onion-adversary",
            Role::Persistent => "persistent",
            Role::Miner => "miner",
        }
    }
}
