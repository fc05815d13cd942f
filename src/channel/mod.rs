//! Channel identifier allocation and adjacency tracking.
//!
//! This module issues chain-plausible short channel identifiers and keeps
//! the per-topology record of which node pairs already share a channel.

pub mod allocator;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use allocator::ChannelIdAllocator;
pub use registry::AdjacencyRegistry;
pub use types::{Channel, ChannelId};
