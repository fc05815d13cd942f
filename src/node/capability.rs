//! Stackable node capabilities and the manifest fragment each contributes.

use serde_json::json;

use super::manifest::{Layer, Manifest};
use crate::topology::Chain;

/// Port the metrics exporter sidecar serves on
pub const METRICS_PORT: u16 = 9332;
/// HTTP API port of the circuit breaker sidecar
pub const CIRCUIT_BREAKER_PORT: u16 = 9235;

/// Topology-wide values some fragments depend on
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub chain: Chain,
    /// Challenge script hex, set for signet topologies only
    pub signet_challenge: Option<&'a str>,
    /// Shell-escaped descriptor import document for the miner wallet
    pub descriptor_import: &'a str,
}

/// A value scraped by the metrics exporter sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricProbe {
    BlockHeight,
    FailedPayments,
    PendingHtlcs,
    ChannelBalance,
}

impl MetricProbe {
    /// Exporter expression for this probe, including the trailing separator
    pub fn expression(&self) -> &'static str {
        match self {
            MetricProbe::BlockHeight => r#"lnd_block_height=parse("/v1/getinfo","block_height") "#,
            MetricProbe::FailedPayments => "failed_payments=FAILED_PAYMENTS ",
            MetricProbe::PendingHtlcs => "pending_htlcs=PENDING_HTLCS ",
            MetricProbe::ChannelBalance => {
                r#"lnd_balance_channels=parse("/v1/balance/channels","balance") "#
            }
        }
    }
}

/// Behaviour layered on top of a base node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Prometheus exporter sidecar scraping the listed probes
    Metrics(Vec<MetricProbe>),
    /// Crash-observable runtime vulnerable to gossip floods
    GossipAdversary,
    /// Crash-observable runtime vulnerable to malformed onions
    OnionAdversary,
    /// Persistent volumes for both chain and runtime data
    Persistence,
    /// HTLC admission control through a circuit breaker sidecar
    AdmissionControl,
    /// Block producer with wallet bootstrap and graph visualizer sidecars
    ChainMiner,
}

impl Capability {
    /// Metrics capability exporting block height plus `extra` probes
    pub fn metrics(extra: &[MetricProbe]) -> Self {
        let mut probes = vec![MetricProbe::BlockHeight];
        probes.extend_from_slice(extra);
        Capability::Metrics(probes)
    }

    /// Layers this capability writes, in application order.
    ///
    /// Each field of a layer replaces whatever an earlier layer or the base
    /// attributes stored under the same key.
    pub fn layers(&self, ctx: &RenderContext<'_>) -> Vec<Layer> {
        match self {
            Capability::Metrics(probes) => vec![metrics_layer(probes)],
            Capability::GossipAdversary => vec![crash_observable_layer("500Mi")],
            Capability::OnionAdversary => vec![crash_observable_layer("1000Mi")],
            Capability::Persistence => vec![
                Layer::root(json!({"persistence": {"enabled": true, "size": "20Gi"}})),
                Layer::at(&["lnd"], json!({"persistence": {"enabled": true, "size": "10Gi"}})),
            ],
            Capability::AdmissionControl => vec![Layer::at(
                &["lnd"],
                json!({
                    "circuitbreaker": {
                        "enabled": true,
                        "httpPort": CIRCUIT_BREAKER_PORT
                    }
                }),
            )],
            Capability::ChainMiner => vec![miner_layer(ctx)],
        }
    }

    /// This capability's layers applied to an empty manifest
    pub fn fragment(&self, ctx: &RenderContext<'_>) -> Manifest {
        Manifest::new().layered(&self.layers(ctx))
    }
}

fn metrics_layer(probes: &[MetricProbe]) -> Layer {
    let expressions: String = probes.iter().map(MetricProbe::expression).collect();
    Layer::at(
        &["lnd"],
        json!({
            "metricsExport": true,
            "prometheusMetricsPort": METRICS_PORT,
            "extraContainers": [
                {
                    "name": "lnd-exporter",
                    "image": "bitcoindevproject/lnd-exporter:0.2.0",
                    "imagePullPolicy": "IfNotPresent",
                    "volumeMounts": [
                        {
                            "name": "config",
                            "mountPath": "/macaroon.hex",
                            "subPath": "MACAROON_HEX"
                        }
                    ],
                    "env": [
                        {"name": "METRICS", "value": expressions}
                    ],
                    "ports": [
                        {
                            "name": "prom-metrics",
                            "containerPort": METRICS_PORT,
                            "protocol": "TCP"
                        }
                    ]
                }
            ]
        }),
    )
}

// Adversary nodes are expected to fall over; keep them down once they do.
fn crash_observable_layer(memory_limit: &str) -> Layer {
    Layer::at(
        &["lnd"],
        json!({
            "restartPolicy": "Never",
            "resources": {
                "limits": {"cpu": "4000m", "memory": memory_limit},
                "requests": {"cpu": "100m", "memory": "200Mi"}
            }
        }),
    )
}

// Written at the root: the miner's runtime block is the sidecars alone.
fn miner_layer(ctx: &RenderContext<'_>) -> Layer {
    let macaroon_path = format!("/root/.lnd/data/chain/bitcoin/{}/admin.macaroon", ctx.chain.as_str());
    Layer::root(json!({
        "startupProbe": {
            "failureThreshold": 10,
            "periodSeconds": 30,
            "successThreshold": 1,
            "timeoutSeconds": 60,
            "exec": {
                "command": [
                    "/bin/sh",
                    "-c",
                    format!(
                        "bitcoin-cli createwallet miner && bitcoin-cli importdescriptors {}",
                        ctx.descriptor_import
                    )
                ]
            }
        },
        "lnd": {
            "extraContainers": [
                {
                    "name": "lnvisweb",
                    "image": "bitcoindevproject/lnvisualizer:latest",
                    "ports": [
                        {"name": "web", "containerPort": 80, "protocol": "TCP"}
                    ],
                    "env": [
                        {"name": "LN_VISUALIZER_API_URL", "value": "http://127.0.0.1:5647"}
                    ]
                },
                {
                    "name": "lnvisapi",
                    "image": "maxkotlan/ln-visualizer-api:v0.0.28",
                    "ports": [
                        {"name": "api", "containerPort": 5647, "protocol": "TCP"}
                    ],
                    "env": [
                        {"name": "LND_CERT_FILE", "value": "/tls.cert"},
                        {"name": "LND_MACAROON_FILE", "value": macaroon_path},
                        {"name": "LND_SOCKET", "value": "localhost:10009"},
                        {"name": "LNVIS_RESYNCTIMER", "value": "* * * * *"}
                    ],
                    "volumeMounts": [
                        {"name": "shared-volume", "mountPath": "/root/.lnd/"},
                        {"name": "config", "mountPath": "/tls.cert", "subPath": "tls.cert"}
                    ]
                }
            ]
        }
    }))
}
