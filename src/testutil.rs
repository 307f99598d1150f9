//! In-memory engine doubles for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::engine::{
    EngineMessage, EnginePlugin, GameHandle, MetadataDb, PluginMetadata, SortEngine,
};
use crate::games::GameType;

/// Metadata database double. Lookups are case-insensitive over lowercase
/// keys, matching how the report layer queries by sorted-order name.
#[derive(Default)]
pub struct FakeDb {
    pub loaded: Option<(PathBuf, Option<PathBuf>)>,
    pub general: Vec<EngineMessage>,
    pub metadata: HashMap<String, PluginMetadata>,
}

impl MetadataDb for FakeDb {
    fn load_lists(&mut self, masterlist: &Path, userlist: Option<&Path>) -> Result<()> {
        self.loaded = Some((masterlist.to_path_buf(), userlist.map(Path::to_path_buf)));
        Ok(())
    }

    fn general_messages(&self) -> Result<Vec<EngineMessage>> {
        Ok(self.general.clone())
    }

    fn plugin_metadata(&self, name: &str) -> Result<Option<PluginMetadata>> {
        Ok(self.metadata.get(&name.to_lowercase()).cloned())
    }
}

/// Game handle double. With `sorted` unset, sorting echoes its input.
#[derive(Default)]
pub struct FakeHandle {
    pub db: FakeDb,
    pub plugins: HashMap<String, EnginePlugin>,
    pub sorted: Option<Vec<String>>,
    pub state_loaded: bool,
}

impl GameHandle for FakeHandle {
    fn is_valid_plugin(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.ends_with(".esp") || lower.ends_with(".esm") || lower.ends_with(".esl")
    }

    fn load_current_load_order_state(&mut self) -> Result<()> {
        self.state_loaded = true;
        Ok(())
    }

    fn sort_plugins(&mut self, plugins: &[String]) -> Result<Vec<String>> {
        Ok(self.sorted.clone().unwrap_or_else(|| plugins.to_vec()))
    }

    fn plugin(&self, name: &str) -> Option<EnginePlugin> {
        self.plugins.get(&name.to_lowercase()).cloned()
    }

    fn database(&mut self) -> &mut dyn MetadataDb {
        &mut self.db
    }
}

/// Engine double holding a single prepared handle.
pub struct FakeEngine {
    handle: RefCell<Option<FakeHandle>>,
    pub version: String,
}

impl FakeEngine {
    pub fn new(handle: FakeHandle) -> Self {
        Self {
            handle: RefCell::new(Some(handle)),
            version: "9.9.9".to_string(),
        }
    }
}

impl SortEngine for FakeEngine {
    fn create_game_handle(
        &self,
        _game_type: GameType,
        _game_path: &Path,
        _profile_path: &Path,
    ) -> Result<Box<dyn GameHandle>> {
        let handle = self
            .handle
            .borrow_mut()
            .take()
            .ok_or_else(|| anyhow!("game handle already created"))?;
        Ok(Box::new(handle))
    }

    fn version(&self) -> String {
        self.version.clone()
    }
}
