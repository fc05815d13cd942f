//! Topology type definitions.

use serde::{Deserialize, Serialize};

use crate::credentials::{BootstrapError, CredentialError};

/// Team labels, in assignment order
pub const TEAMS: [&str; 12] = [
    "aries",
    "taurus",
    "gemini",
    "cancer",
    "leo",
    "virgo",
    "libra",
    "scorpio",
    "sagittarius",
    "capricorn",
    "aquarius",
    "pisces",
];

/// Team display colors, matched to [`TEAMS`] by position
pub const COLORS: [&str; 12] = [
    "#e6194b",
    "#3cb44b",
    "#ffe119",
    "#4363d8",
    "#f58231",
    "#911eb4",
    "#46f0f0",
    "#f032e6",
    "#bcf60c",
    "#fabebe",
    "#008080",
    "#e6beff",
];

/// Chain the simulated network runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Local test chain with on-demand blocks
    Regtest,
    /// Signed test chain; blocks require the generated challenge key
    Signet,
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Regtest => "regtest",
            Chain::Signet => "signet",
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Chain::Signet
    }
}

/// A competing team: a label and the color its nodes are drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Team {
    pub label: &'static str,
    pub color: &'static str,
}

impl Team {
    /// The team at position `index`, if one exists
    pub fn nth(index: usize) -> Option<Team> {
        Some(Team {
            label: TEAMS.get(index).copied()?,
            color: COLORS.get(index).copied()?,
        })
    }

    /// The first `count` teams
    pub fn first(count: usize) -> Result<Vec<Team>, TopologyError> {
        if count > TEAMS.len() {
            return Err(TopologyError::TooManyTeams {
                requested: count,
                available: TEAMS.len(),
            });
        }
        Ok((0..count).filter_map(Team::nth).collect())
    }

    /// Namespace a team's players are confined to
    pub fn namespace(&self) -> String {
        format!("wargames-{}", self.label)
    }
}

/// Errors raised while building a topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Requested {requested} teams but only {available} are defined")]
    TooManyTeams { requested: usize, available: usize },

    #[error("Node {0} already exists")]
    DuplicateNode(String),

    #[error("Unknown node {0}")]
    UnknownNode(String),

    #[error("Topology already has a miner")]
    MinerExists,

    #[error("Armada nodes peer with the miner; add the miner first")]
    MissingMiner,

    #[error("Credential unavailable: {0}")]
    Credential(#[from] CredentialError),

    #[error("Chain bootstrap unavailable: {0}")]
    Bootstrap(#[from] BootstrapError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_palette_is_positional() {
        let teams = Team::first(3).unwrap();
        assert_eq!(teams[0], Team { label: "aries", color: "#e6194b" });
        assert_eq!(teams[2].label, "gemini");
        assert_eq!(teams[2].color, "#ffe119");
        assert_eq!(teams[1].namespace(), "wargames-taurus");
    }

    #[test]
    fn test_too_many_teams() {
        assert!(Team::first(12).is_ok());
        assert!(matches!(
            Team::first(13),
            Err(TopologyError::TooManyTeams { requested: 13, available: 12 })
        ));
        assert_eq!(Team::nth(12), None);
    }

    #[test]
    fn test_chain_serialization() {
        assert_eq!(serde_yaml::to_string(&Chain::Signet).unwrap().trim(), "signet");
        let chain: Chain = serde_yaml::from_str("regtest").unwrap();
        assert_eq!(chain, Chain::Regtest);
    }
}
