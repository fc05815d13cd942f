//! Node model: base node attributes plus stackable capabilities.
//!
//! A node's exported manifest is built by rendering its base attributes and
//! then applying each capability's layers in application order. A later
//! layer replaces any field an earlier one wrote; nothing is merged.

pub mod capability;
pub mod manifest;
pub mod role;
pub mod types;

// Re-export commonly used types
pub use capability::{Capability, MetricProbe, RenderContext};
pub use manifest::{Layer, Manifest};
pub use role::Role;
pub use types::{Credential, Image, Node, DEFAULT_COLOR};
