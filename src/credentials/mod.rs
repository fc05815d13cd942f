//! External collaborators that supply secrets for generated nodes.
//!
//! - `macaroon`: admin token issuance per node
//! - `bootstrap`: signet challenge and miner wallet descriptor

pub mod bootstrap;
pub mod macaroon;

pub use bootstrap::{
    descriptor_import, BootstrapError, BootstrapProvider, ChainBootstrap, CommandBootstrap,
    StaticBootstrap,
};
pub use macaroon::{CredentialError, CredentialProvider, LncliBaker, StaticCredentials};
