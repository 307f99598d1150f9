//! Application data paths
//!
//! The orchestrator shares its data root with the desktop LOOT install so
//! that masterlists, userlists and settings written by either tool are seen
//! by both: `<local-app-data>/LOOT/`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Resolves files under the shared application data root.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Data root from the platform's local app-data directory.
    pub fn new() -> Option<Self> {
        let dirs = BaseDirs::new()?;
        Some(Self {
            root: dirs.data_local_dir().join("LOOT"),
        })
    }

    /// Data root at an explicit location (used by tests).
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform local app-data directory, or empty if it cannot be resolved.
    pub fn local_app_data() -> PathBuf {
        BaseDirs::new()
            .map(|d| d.data_local_dir().to_path_buf())
            .unwrap_or_default()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Legacy settings document: `<root>/settings.toml`.
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.toml")
    }

    /// Per-game masterlist: `<root>/<folder>/masterlist.yaml`.
    pub fn masterlist_file(&self, folder_name: &str) -> PathBuf {
        self.root.join(folder_name).join("masterlist.yaml")
    }

    /// Per-game userlist: `<root>/<folder>/userlist.yaml`.
    pub fn userlist_file(&self, folder_name: &str) -> PathBuf {
        self.root.join(folder_name).join("userlist.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_game_files_nest_under_folder() {
        let paths = AppPaths::at("/data/LOOT");
        assert_eq!(
            paths.masterlist_file("Skyrim Special Edition"),
            PathBuf::from("/data/LOOT/Skyrim Special Edition/masterlist.yaml")
        );
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/data/LOOT/settings.toml")
        );
    }
}
