//! Channel adjacency registry.
//!
//! Tracks, per source node, the set of nodes it already opened a channel
//! to. A topology allows at most one channel per unordered node pair, so
//! lookups check both directions.

use std::collections::{BTreeMap, BTreeSet};

/// Append-only record of every channel edge in a topology, keyed by node name
#[derive(Debug, Clone, Default)]
pub struct AdjacencyRegistry {
    /// Source node -> nodes it has a channel to
    targets_by_source: BTreeMap<String, BTreeSet<String>>,
    /// Number of channels registered so far
    total: usize,
}

impl AdjacencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a channel from `source` to `target`
    pub fn register(&mut self, source: &str, target: &str) {
        self.targets_by_source
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
        self.total += 1;
    }

    /// True if a channel exists between `a` and `b` in either direction
    pub fn link_exists(&self, a: &str, b: &str) -> bool {
        self.has_edge(a, b) || self.has_edge(b, a)
    }

    /// True only for a channel opened by `source` towards `target`
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.targets_by_source
            .get(source)
            .map_or(false, |targets| targets.contains(target))
    }

    /// Total number of registered channels
    pub fn total(&self) -> usize {
        self.total
    }

    /// Targets reached from `source`, in name order
    pub fn targets_of(&self, source: &str) -> impl Iterator<Item = &str> {
        self.targets_by_source
            .get(source)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_exists_both_directions() {
        let mut registry = AdjacencyRegistry::new();
        registry.register("tank-0000", "tank-0001");

        assert!(registry.link_exists("tank-0000", "tank-0001"));
        assert!(registry.link_exists("tank-0001", "tank-0000"));
        assert!(registry.has_edge("tank-0000", "tank-0001"));
        assert!(!registry.has_edge("tank-0001", "tank-0000"));
        assert!(!registry.link_exists("tank-0000", "tank-0002"));
    }

    #[test]
    fn test_total_counts_every_registration() {
        let mut registry = AdjacencyRegistry::new();
        registry.register("a", "b");
        registry.register("a", "c");
        registry.register("c", "d");
        assert_eq!(registry.total(), 3);
        assert_eq!(registry.targets_of("a").collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(registry.targets_of("missing").count(), 0);
    }
}
