//! Per-run game configuration
//!
//! A [`GameSettings`] record starts from catalog defaults, may be overridden
//! by a matching entry in a legacy settings document ([`legacy`]), and is
//! finalized with the run's actual game path.

pub mod legacy;
mod paths;
pub mod source;

pub use paths::AppPaths;

use std::path::{Path, PathBuf};

use crate::games::{GameId, GameType};

/// Canonical per-run configuration for one game.
///
/// The id is fixed at construction; everything else can be overridden by
/// settings migration.
#[derive(Debug, Clone)]
pub struct GameSettings {
    id: GameId,
    name: String,
    master_filename: String,
    minimum_header_version: f32,
    folder_name: String,
    masterlist_source: String,
    game_path: PathBuf,
    game_local_path: PathBuf,
}

impl GameSettings {
    /// Catalog defaults for `id`, with the per-game data folder named after
    /// the id unless a legacy document says otherwise.
    pub fn new(id: GameId) -> Self {
        Self::with_folder(id, id.default_folder_name())
    }

    /// Catalog defaults with an explicit data folder name.
    pub fn with_folder(id: GameId, folder_name: &str) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            master_filename: id.master_filename().to_string(),
            minimum_header_version: id.minimum_header_version(),
            folder_name: folder_name.to_string(),
            masterlist_source: id.default_masterlist_url(),
            game_path: PathBuf::new(),
            game_local_path: PathBuf::new(),
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn game_type(&self) -> GameType {
        self.id.game_type()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn master_filename(&self) -> &str {
        &self.master_filename
    }

    pub fn minimum_header_version(&self) -> f32 {
        self.minimum_header_version
    }

    /// Per-game subdirectory under the application data root.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// URL or local path the masterlist is updated from.
    pub fn masterlist_source(&self) -> &str {
        &self.masterlist_source
    }

    pub fn game_path(&self) -> &Path {
        &self.game_path
    }

    pub fn game_local_path(&self) -> &Path {
        &self.game_local_path
    }

    /// Directory the game loads plugins from.
    pub fn data_path(&self) -> PathBuf {
        self.game_path.join(self.game_type().plugins_folder_name())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_master_filename(&mut self, master: impl Into<String>) -> &mut Self {
        self.master_filename = master.into();
        self
    }

    pub fn set_minimum_header_version(&mut self, version: f32) -> &mut Self {
        self.minimum_header_version = version;
        self
    }

    pub fn set_masterlist_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.masterlist_source = source.into();
        self
    }

    pub fn set_game_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.game_path = path.into();
        self
    }

    pub fn set_game_local_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.game_local_path = path.into();
        self
    }

    /// Resolve a bare folder name against the local app-data root, the way
    /// legacy documents recorded `local_folder`.
    pub fn set_game_local_folder(&mut self, folder_name: &str) -> &mut Self {
        self.game_local_path = AppPaths::local_app_data().join(folder_name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_from_catalog() {
        let settings = GameSettings::new(GameId::SkyrimSE);
        assert_eq!(settings.name(), "TES V: Skyrim Special Edition");
        assert_eq!(settings.master_filename(), "Skyrim.esm");
        assert_eq!(settings.folder_name(), "Skyrim Special Edition");
        assert!(settings.masterlist_source().contains("/loot/skyrimse/"));
    }

    #[test]
    fn test_data_path_uses_plugins_folder() {
        let mut settings = GameSettings::new(GameId::Morrowind);
        settings.set_game_path("/games/morrowind");
        assert_eq!(
            settings.data_path(),
            PathBuf::from("/games/morrowind/Data Files")
        );
    }

    #[test]
    fn test_setters_do_not_touch_id() {
        let mut settings = GameSettings::new(GameId::Skyrim);
        settings.set_name("renamed").set_master_filename("Other.esm");
        assert_eq!(settings.id(), GameId::Skyrim);
        assert_eq!(settings.name(), "renamed");
    }
}
