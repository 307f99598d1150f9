//! Sorting engine interface
//!
//! The dependency-graph construction, conditional metadata evaluation and
//! the topological sort itself live in an external engine. These traits are
//! the seam: the orchestrator drives them, tests substitute fakes.

use std::path::Path;

use anyhow::Result;

use crate::games::GameType;

/// Language engine messages fall back to when no translation matches.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Severity of an engine message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Say,
    Warn,
    Error,
    /// A kind this tool does not know; the raw discriminant is kept for
    /// diagnostics.
    Other(i32),
}

/// One localized variant of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent {
    pub text: String,
    pub language: String,
}

impl MessageContent {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

/// A message attached to a plugin or to the run as a whole.
#[derive(Debug, Clone)]
pub struct EngineMessage {
    pub kind: MessageKind,
    pub content: Vec<MessageContent>,
}

impl EngineMessage {
    /// Text for the given language, with the engine's fallback rule.
    pub fn text_for(&self, language: &str) -> Option<&str> {
        select_content(&self.content, language).map(|c| c.text.as_str())
    }
}

/// Pick the content variant for a language: exact match first, then the
/// designated default language, then a sole variant if that is all there is.
pub fn select_content<'a>(
    contents: &'a [MessageContent],
    language: &str,
) -> Option<&'a MessageContent> {
    contents
        .iter()
        .find(|c| c.language == language)
        .or_else(|| contents.iter().find(|c| c.language == DEFAULT_LANGUAGE))
        .or_else(|| if contents.len() == 1 { contents.first() } else { None })
}

/// Dirty or clean plugin information from the masterlist.
#[derive(Debug, Clone)]
pub struct CleaningData {
    pub crc: u32,
    pub itm_count: u32,
    pub deleted_reference_count: u32,
    pub deleted_navmesh_count: u32,
    pub cleaning_utility: String,
    pub detail: Vec<MessageContent>,
}

/// What the engine knows about a loaded plugin file.
#[derive(Debug, Clone, Default)]
pub struct EnginePlugin {
    pub masters: Vec<String>,
    pub loads_archive: bool,
    pub is_master: bool,
    pub is_light_plugin: bool,
}

/// Evaluated metadata for one plugin.
#[derive(Debug, Clone, Default)]
pub struct PluginMetadata {
    /// Names of plugins this one is incompatible with.
    pub incompatibilities: Vec<String>,
    pub messages: Vec<EngineMessage>,
    pub dirty: Vec<CleaningData>,
    pub clean: Vec<CleaningData>,
}

impl PluginMetadata {
    pub fn is_empty(&self) -> bool {
        self.incompatibilities.is_empty()
            && self.messages.is_empty()
            && self.dirty.is_empty()
            && self.clean.is_empty()
    }
}

/// Entry point into the external engine.
pub trait SortEngine {
    fn create_game_handle(
        &self,
        game_type: GameType,
        game_path: &Path,
        profile_path: &Path,
    ) -> Result<Box<dyn GameHandle>>;

    /// Engine version string, reported in run statistics.
    fn version(&self) -> String;

    /// Language the engine falls back to for untranslated messages.
    fn default_language(&self) -> String {
        DEFAULT_LANGUAGE.to_string()
    }
}

/// Per-game engine handle.
pub trait GameHandle {
    /// Whether the named file in the data directory is a plugin the engine
    /// can load.
    fn is_valid_plugin(&self, name: &str) -> bool;

    fn load_current_load_order_state(&mut self) -> Result<()>;

    fn sort_plugins(&mut self, names: &[String]) -> Result<Vec<String>>;

    /// Loaded plugin details, if the engine knows the name.
    fn plugin(&self, name: &str) -> Option<EnginePlugin>;

    fn database(&mut self) -> &mut dyn MetadataDb;
}

/// Engine used when no backend is linked into the binary. Settings
/// migration and argument validation still run; the first engine call
/// fails with a clear diagnostic.
pub struct UnlinkedEngine;

impl SortEngine for UnlinkedEngine {
    fn create_game_handle(
        &self,
        _game_type: GameType,
        _game_path: &Path,
        _profile_path: &Path,
    ) -> Result<Box<dyn GameHandle>> {
        anyhow::bail!("no sorting engine backend is linked into this build")
    }

    fn version(&self) -> String {
        "unavailable".to_string()
    }
}

/// Metadata database sub-interface of a game handle.
pub trait MetadataDb {
    fn load_lists(&mut self, masterlist: &Path, userlist: Option<&Path>) -> Result<()>;

    fn general_messages(&self) -> Result<Vec<EngineMessage>>;

    fn plugin_metadata(&self, name: &str) -> Result<Option<PluginMetadata>>;
}
