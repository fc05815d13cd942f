//! Document export.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::{NamespaceDefaults, NamespacesDocument, NetworkDefaults, NetworkDocument};
use crate::topology::{Team, Topology};

pub const BATTLEFIELDS_DIR: &str = "battlefields";
pub const ARMADAS_DIR: &str = "armadas";
pub const ARMIES_DIR: &str = "armies";

const NETWORK_FILE: &str = "network.yaml";
const NODE_DEFAULTS_FILE: &str = "node-defaults.yaml";
const NAMESPACES_FILE: &str = "namespaces.yaml";
const NAMESPACE_DEFAULTS_FILE: &str = "namespace-defaults.yaml";

/// Writes topology documents below an output root
#[derive(Debug, Clone)]
pub struct FleetWriter {
    root: PathBuf,
}

impl FleetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the main network and, when it has one, the armada network.
    ///
    /// Returns the paths of every file written.
    pub fn write(&self, topology: &Topology) -> Result<Vec<PathBuf>> {
        let defaults = NetworkDefaults::new(topology.name());
        let mut written = self.write_yaml_dir(
            BATTLEFIELDS_DIR,
            topology.name(),
            &NetworkDocument::battlefield(topology),
            &defaults,
            NETWORK_FILE,
            NODE_DEFAULTS_FILE,
        )?;

        if !topology.armada().is_empty() {
            written.extend(self.write_yaml_dir(
                ARMADAS_DIR,
                topology.name(),
                &NetworkDocument::armada(topology),
                &defaults,
                NETWORK_FILE,
                NODE_DEFAULTS_FILE,
            )?);
        }

        Ok(written)
    }

    /// Write namespace groupings for the first `count` teams
    pub fn write_teams(&self, network_name: &str, count: usize) -> Result<Vec<PathBuf>> {
        let teams = Team::first(count)?;
        self.write_yaml_dir(
            ARMIES_DIR,
            network_name,
            &NamespacesDocument::for_teams(&teams),
            &NamespaceDefaults::default(),
            NAMESPACES_FILE,
            NAMESPACE_DEFAULTS_FILE,
        )
    }

    fn write_yaml_dir<M: Serialize, D: Serialize>(
        &self,
        subdir: &str,
        name: &str,
        main: &M,
        defaults: &D,
        main_filename: &str,
        defaults_filename: &str,
    ) -> Result<Vec<PathBuf>> {
        let parent = self.root.join(subdir);
        fs::create_dir_all(&parent)
            .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;

        let dir = parent.join(name);
        info!("Creating {} directory {}...", subdir, dir.display());
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => info!("...already exists"),
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("Failed to create directory '{}'", dir.display()))
            }
        }

        let main_path = dir.join(main_filename);
        write_yaml(&main_path, main)?;
        let defaults_path = dir.join(defaults_filename);
        write_yaml(&defaults_path, defaults)?;

        Ok(vec![main_path, defaults_path])
    }
}

fn write_yaml<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Writing {}...", path.display());
    let yaml = serde_yaml::to_string(data)
        .wrap_err_with(|| format!("Failed to serialize '{}'", path.display()))?;
    fs::write(path, yaml).wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_support::topology;
    use crate::topology::Chain;
    use tempfile::TempDir;

    #[test]
    fn test_write_layout() {
        let out = TempDir::new().unwrap();
        let mut topo = topology(Chain::Regtest, 1);
        topo.add_nodes(2).unwrap();
        topo.add_miner().unwrap();
        topo.add_armada(1).unwrap();

        let writer = FleetWriter::new(out.path());
        let files = writer.write(&topo).unwrap();

        assert_eq!(files.len(), 4);
        let network = out.path().join("battlefields/test/network.yaml");
        assert!(network.exists());
        assert!(out.path().join("armadas/test/network.yaml").exists());
        let defaults = fs::read_to_string(out.path().join("battlefields/test/node-defaults.yaml")).unwrap();
        assert_eq!(defaults.trim(), "warnet: test");
    }

    #[test]
    fn test_no_armada_directory_without_armada() {
        let out = TempDir::new().unwrap();
        let mut topo = topology(Chain::Regtest, 1);
        topo.add_nodes(1).unwrap();
        FleetWriter::new(out.path()).write(&topo).unwrap();
        assert!(!out.path().join(ARMADAS_DIR).exists());
    }

    #[test]
    fn test_rewrite_overwrites_and_keeps_other_files() {
        let out = TempDir::new().unwrap();
        let writer = FleetWriter::new(out.path());
        let mut topo = topology(Chain::Regtest, 1);
        topo.add_nodes(1).unwrap();
        writer.write(&topo).unwrap();

        let dir = out.path().join("battlefields/test");
        fs::write(dir.join("network.yaml"), "stale").unwrap();
        fs::write(dir.join("notes.txt"), "keep me").unwrap();

        writer.write(&topo).unwrap();
        let network = fs::read_to_string(dir.join("network.yaml")).unwrap();
        assert!(network.contains("tank-0000"));
        assert_eq!(fs::read_to_string(dir.join("notes.txt")).unwrap(), "keep me");
    }

    #[test]
    fn test_write_teams() {
        let out = TempDir::new().unwrap();
        let files = FleetWriter::new(out.path()).write_teams("signet100", 2).unwrap();
        assert_eq!(files.len(), 2);

        let namespaces = fs::read_to_string(out.path().join("armies/signet100/namespaces.yaml")).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&namespaces).unwrap();
        assert_eq!(parsed["namespaces"][1]["name"].as_str(), Some("wargames-taurus"));

        let defaults =
            fs::read_to_string(out.path().join("armies/signet100/namespace-defaults.yaml")).unwrap();
        assert!(defaults.contains("warnet-user"));
        assert!(defaults.contains("ingress-controller-viewer"));
    }

    #[test]
    fn test_write_teams_rejects_unknown_team_count() {
        let out = TempDir::new().unwrap();
        assert!(FleetWriter::new(out.path()).write_teams("x", 13).is_err());
    }
}
