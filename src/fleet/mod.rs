//! Fleet assembly and export.
//!
//! Turns finished topologies into the documents the deployment tooling
//! consumes. Each document set lives in its own directory:
//!
//! ```text
//! <output>/
//! |-- battlefields/<network>/network.yaml, node-defaults.yaml
//! |-- armadas/<network>/network.yaml, node-defaults.yaml
//! \-- armies/<network>/namespaces.yaml, namespace-defaults.yaml
//! ```
//!
//! Writing is file-by-file replacement: rerunning an export overwrites the
//! generated files and leaves anything else in those directories alone.

pub mod types;
pub mod writer;

pub use types::{NamespaceDefaults, NamespacesDocument, NetworkDefaults, NetworkDocument};
pub use writer::{FleetWriter, ARMADAS_DIR, ARMIES_DIR, BATTLEFIELDS_DIR};
