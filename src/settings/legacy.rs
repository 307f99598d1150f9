//! Legacy settings document migration
//!
//! The on-disk settings format accreted fields over many releases: alternate
//! key names, a git `(repo, branch)` pair that later became a single source
//! URL, and a boolean that once disambiguated total conversions from their
//! base game. Each `[[games]]` table is normalized into one intermediate
//! record with explicit, ordered presence checks; a malformed table is
//! skipped without aborting the scan.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use super::{source, GameSettings};
use crate::error::Error;
use crate::games::{GameId, GameType, DEFAULT_MASTERLIST_BRANCH};

/// Marker executable that identifies a total-conversion install, and the
/// codename its title and folder heuristics match on.
struct VariantSignals {
    base: GameId,
    variant: GameId,
    marker: &'static str,
    codename: &'static str,
}

/// Result of scanning a legacy document for one target game.
#[derive(Debug, Default)]
pub struct MigrationOutcome {
    /// Override settings from the first matching entry, if any.
    pub settings: Option<GameSettings>,
    /// Top-level `language` key, if present.
    pub language: Option<String>,
}

/// One `[[games]]` table, normalized.
#[derive(Debug, Default)]
struct LegacyEntry {
    folder: String,
    name: Option<String>,
    master: Option<String>,
    minimum_header_version: Option<f64>,
    masterlist_source: Option<String>,
    repo: Option<String>,
    branch: Option<String>,
    path: Option<PathBuf>,
    local_path: Option<PathBuf>,
    local_folder: Option<String>,
    is_base_game_instance: Option<bool>,
}

/// Parse a settings document from disk.
pub fn load_document(path: &Path) -> Result<toml::Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    content
        .parse::<toml::Table>()
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}

/// Scan a legacy document for the target game. The first entry that resolves
/// to `target` wins; later matches are ignored. Entries for other games and
/// malformed entries are skipped.
pub fn migrate(document: &toml::Table, target: GameId) -> MigrationOutcome {
    let mut outcome = MigrationOutcome {
        language: document
            .get("language")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        ..Default::default()
    };

    let Some(games) = document.get("games").and_then(|v| v.as_array()) else {
        return outcome;
    };

    for value in games {
        match migrate_entry(value, target) {
            Ok(Some(settings)) => {
                outcome.settings = Some(settings);
                break;
            }
            Ok(None) => {}
            Err(e) => debug!("skipping invalid game settings entry: {:#}", e),
        }
    }

    outcome
}

fn migrate_entry(value: &toml::Value, target: GameId) -> Result<Option<GameSettings>> {
    let Some(table) = value.as_table() else {
        bail!("game settings entry is not a table");
    };

    // "type" was called "gameId" in some format generations.
    let type_name = get_str(table, "type")
        .or_else(|| get_str(table, "gameId"))
        .context("'type' key missing from game settings table")?;
    let folder = get_str(table, "folder").context("'folder' key missing from game settings table")?;

    let Some(game_type) = entry_game_type(&type_name, &folder) else {
        bail!("invalid value \"{}\" for 'type' key", type_name);
    };
    if game_type != target.game_type() {
        return Ok(None);
    }

    let entry = LegacyEntry {
        folder,
        name: get_str(table, "name"),
        master: get_str(table, "master"),
        minimum_header_version: get_float(table, "minimumHeaderVersion"),
        masterlist_source: get_str(table, "masterlistSource"),
        repo: get_str(table, "repo"),
        branch: get_str(table, "branch"),
        path: get_str(table, "path").map(PathBuf::from),
        local_path: get_str(table, "local_path").map(PathBuf::from),
        local_folder: get_str(table, "local_folder"),
        is_base_game_instance: table.get("isBaseGameInstance").and_then(|v| v.as_bool()),
    };

    if entry.local_path.is_some() && entry.local_folder.is_some() {
        return Err(Error::ConfigEntry(
            "'local_path' and 'local_folder' are mutually exclusive".to_string(),
        )
        .into());
    }

    if resolve_entry_id(game_type, &entry) != target {
        return Ok(None);
    }

    Ok(Some(apply_entry(target, entry)))
}

/// Build the override settings from a normalized entry.
fn apply_entry(target: GameId, entry: LegacyEntry) -> GameSettings {
    let mut settings = GameSettings::with_folder(target, &entry.folder);

    if let Some(name) = entry.name {
        settings.set_name(name);
    }
    if let Some(master) = entry.master {
        settings.set_master_filename(master);
    }
    if let Some(version) = entry.minimum_header_version {
        settings.set_minimum_header_version(version as f32);
    }
    if let Some(path) = entry.path {
        settings.set_game_path(path);
    }
    if let Some(local_path) = entry.local_path {
        settings.set_game_local_path(local_path);
    } else if let Some(local_folder) = entry.local_folder {
        settings.set_game_local_folder(&local_folder);
    }

    if let Some(source) = entry.masterlist_source {
        settings.set_masterlist_source(source::migrate_masterlist_source(&source));
    } else if let Some(repo) = entry.repo {
        let branch = entry
            .branch
            .as_deref()
            .map(source::migrate_branch)
            .unwrap_or(DEFAULT_MASTERLIST_BRANCH);
        if let Some(migrated) = source::resolve_repo_source(target, &repo, branch) {
            settings.set_masterlist_source(migrated);
        }
        // On failure the catalog default stays in effect.
    }

    settings
}

/// Resolve the engine variant recorded by a legacy entry.
///
/// Documents written before the Special Edition had its own type recorded SE
/// installs as `type = "Skyrim"` with an SE folder name; those are upgraded
/// here.
fn entry_game_type(type_name: &str, folder: &str) -> Option<GameType> {
    let game_type = GameType::from_settings_type_name(type_name)?;
    if game_type == GameType::Tes5 && folder.to_lowercase().contains("special edition") {
        return Some(GameType::Tes5Se);
    }
    Some(game_type)
}

/// Decide which title of a shared engine variant an entry describes.
///
/// Signals are checked in strict precedence order and the first definite
/// answer stands: a marker executable under a recorded, existing install
/// path is authoritative in both directions; then the variant codename in
/// the display name, then in the folder name; then the historical
/// `isBaseGameInstance` flag; and finally the base title.
fn resolve_entry_id(game_type: GameType, entry: &LegacyEntry) -> GameId {
    let signals = match game_type {
        GameType::Tes4 => VariantSignals {
            base: GameId::Oblivion,
            variant: GameId::Nehrim,
            marker: "NehrimLauncher.exe",
            codename: "nehrim",
        },
        GameType::Tes5 => VariantSignals {
            base: GameId::Skyrim,
            variant: GameId::Enderal,
            marker: "Enderal Launcher.exe",
            codename: "enderal",
        },
        GameType::Tes5Se => VariantSignals {
            base: GameId::SkyrimSE,
            variant: GameId::EnderalSE,
            marker: "Enderal Launcher.exe",
            codename: "enderal",
        },
        other => return other.base_id(),
    };

    if let Some(path) = &entry.path {
        if path.is_dir() {
            return if path.join(signals.marker).is_file() {
                signals.variant
            } else {
                signals.base
            };
        }
    }

    if let Some(name) = &entry.name {
        if name.to_lowercase().contains(signals.codename) {
            return signals.variant;
        }
    }
    if entry.folder.to_lowercase().contains(signals.codename) {
        return signals.variant;
    }
    if entry.is_base_game_instance == Some(false) {
        return signals.variant;
    }

    signals.base
}

fn get_str(table: &toml::Table, key: &str) -> Option<String> {
    table.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn get_float(table: &toml::Table, key: &str) -> Option<f64> {
    let value = table.get(key)?;
    value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(doc: &str) -> toml::Table {
        doc.parse::<toml::Table>().unwrap()
    }

    #[test]
    fn test_no_games_array_yields_no_override() {
        let outcome = migrate(&parse("language = \"de\""), GameId::SkyrimSE);
        assert!(outcome.settings.is_none());
        assert_eq!(outcome.language.as_deref(), Some("de"));
    }

    #[test]
    fn test_field_overrides_applied() {
        let doc = parse(
            r#"
            [[games]]
            type = "Fallout4"
            folder = "Fallout4"
            name = "Fallout 4 (custom)"
            master = "Fallout4Custom.esm"
            minimumHeaderVersion = 1.0
            path = "/games/fo4"
            local_path = "/appdata/Fallout4"
            "#,
        );
        let settings = migrate(&doc, GameId::Fallout4).settings.unwrap();
        assert_eq!(settings.name(), "Fallout 4 (custom)");
        assert_eq!(settings.master_filename(), "Fallout4Custom.esm");
        assert_eq!(settings.minimum_header_version(), 1.0);
        assert_eq!(settings.game_path(), Path::new("/games/fo4"));
        assert_eq!(settings.game_local_path(), Path::new("/appdata/Fallout4"));
    }

    #[test]
    fn test_entries_for_other_games_are_ignored() {
        let doc = parse(
            r#"
            [[games]]
            type = "Oblivion"
            folder = "Oblivion"
            name = "renamed"
            "#,
        );
        assert!(migrate(&doc, GameId::SkyrimSE).settings.is_none());
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim"
            folder = "Skyrim"
            name = "first"

            [[games]]
            type = "Skyrim"
            folder = "Skyrim"
            name = "second"
            "#,
        );
        let settings = migrate(&doc, GameId::Skyrim).settings.unwrap();
        assert_eq!(settings.name(), "first");
    }

    #[test]
    fn test_malformed_entry_does_not_block_siblings() {
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim"

            [[games]]
            type = "Skyrim"
            folder = "Skyrim"
            name = "good"
            "#,
        );
        let settings = migrate(&doc, GameId::Skyrim).settings.unwrap();
        assert_eq!(settings.name(), "good");
    }

    #[test]
    fn test_conflicting_local_keys_abort_that_entry_only() {
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim"
            folder = "Skyrim"
            local_path = "/a"
            local_folder = "b"

            [[games]]
            type = "Skyrim"
            folder = "Skyrim"
            name = "fallback"
            "#,
        );
        let settings = migrate(&doc, GameId::Skyrim).settings.unwrap();
        assert_eq!(settings.name(), "fallback");
    }

    #[test]
    fn test_repo_and_branch_are_migrated() {
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim Special Edition"
            folder = "Skyrim Special Edition"
            repo = "https://github.com/loot/skyrimse.git"
            branch = "master"
            "#,
        );
        let settings = migrate(&doc, GameId::SkyrimSE).settings.unwrap();
        assert_eq!(
            settings.masterlist_source(),
            GameId::SkyrimSE.default_masterlist_url()
        );
    }

    #[test]
    fn test_unmigratable_repo_keeps_catalog_default() {
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim Special Edition"
            folder = "Skyrim Special Edition"
            repo = "https://example.com/not-github"
            branch = "main"
            "#,
        );
        let settings = migrate(&doc, GameId::SkyrimSE).settings.unwrap();
        assert_eq!(
            settings.masterlist_source(),
            GameId::SkyrimSE.default_masterlist_url()
        );
    }

    #[test]
    fn test_custom_direct_source_kept_verbatim() {
        let doc = parse(
            r#"
            [[games]]
            type = "FalloutNV"
            folder = "FalloutNV"
            masterlistSource = "https://example.com/custom/masterlist.yaml"
            "#,
        );
        let settings = migrate(&doc, GameId::FalloutNV).settings.unwrap();
        assert_eq!(
            settings.masterlist_source(),
            "https://example.com/custom/masterlist.yaml"
        );
    }

    #[test]
    fn test_marker_file_beats_name_heuristic() {
        // The entry's name claims Enderal, but the install path holds no
        // Enderal launcher: path evidence wins and the entry resolves to the
        // base game.
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("SkyrimSE.exe"), b"").unwrap();

        let doc = parse(&format!(
            r#"
            [[games]]
            type = "Skyrim Special Edition"
            folder = "Skyrim Special Edition"
            name = "Enderal (mislabelled)"
            path = "{}"
            "#,
            dir.path().display()
        ));
        assert!(migrate(&doc, GameId::EnderalSE).settings.is_none());
        assert!(migrate(&doc, GameId::SkyrimSE).settings.is_some());
    }

    #[test]
    fn test_marker_file_resolves_to_variant() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Enderal Launcher.exe"), b"").unwrap();

        let doc = parse(&format!(
            r#"
            [[games]]
            type = "Skyrim Special Edition"
            folder = "Skyrim Special Edition"
            path = "{}"
            "#,
            dir.path().display()
        ));
        assert!(migrate(&doc, GameId::EnderalSE).settings.is_some());
    }

    #[test]
    fn test_folder_codename_resolves_to_variant() {
        let doc = parse(
            r#"
            [[games]]
            type = "Oblivion"
            folder = "Nehrim"
            "#,
        );
        assert!(migrate(&doc, GameId::Nehrim).settings.is_some());
        assert!(migrate(&doc, GameId::Oblivion).settings.is_none());
    }

    #[test]
    fn test_historical_enderal_se_entry_resolves() {
        // Documents from the era before a dedicated SE type recorded
        // Enderal SE as a Skyrim entry with an SE folder and
        // isBaseGameInstance = false.
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim"
            folder = "Skyrim Special Edition"
            isBaseGameInstance = false
            "#,
        );
        assert!(migrate(&doc, GameId::EnderalSE).settings.is_some());
        assert!(migrate(&doc, GameId::SkyrimSE).settings.is_none());
    }

    #[test]
    fn test_base_variant_is_the_default_resolution() {
        let doc = parse(
            r#"
            [[games]]
            type = "Skyrim"
            folder = "Skyrim"
            "#,
        );
        assert!(migrate(&doc, GameId::Skyrim).settings.is_some());
        assert!(migrate(&doc, GameId::Enderal).settings.is_none());
    }

    #[test]
    fn test_load_document_reports_unreadable_file() {
        let err = load_document(Path::new("/nonexistent/settings.toml")).unwrap_err();
        assert!(err.to_string().contains("settings.toml"));
    }
}
