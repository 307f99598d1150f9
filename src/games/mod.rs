//! Game identities and static per-game metadata
//!
//! Pure lookup tables; no state, no I/O. Every supported title has a
//! [`GameId`]; titles that share an engine variant (a base game and a total
//! conversion, or a base game and its VR build) map to the same [`GameType`].

use anyhow::Result;

use crate::error::Error;

/// Current default branch of the official masterlist repositories.
pub const DEFAULT_MASTERLIST_BRANCH: &str = "v0.21";

/// Default branch names used by older masterlist repository layouts.
/// A configured branch found in this set is upgraded to
/// [`DEFAULT_MASTERLIST_BRANCH`] during settings migration.
pub const OLD_DEFAULT_BRANCHES: &[&str] = &[
    "master", "v0.7", "v0.8", "v0.10", "v0.13", "v0.14", "v0.15", "v0.17",
];

const MORROWIND_MINIMUM_HEADER_VERSION: f32 = 1.2;
const OBLIVION_MINIMUM_HEADER_VERSION: f32 = 0.8;
const SKYRIM_FO3_MINIMUM_HEADER_VERSION: f32 = 0.94;
const SKYRIM_SE_MINIMUM_HEADER_VERSION: f32 = 1.7;
const FONV_MINIMUM_HEADER_VERSION: f32 = 1.32;
const FO4_MINIMUM_HEADER_VERSION: f32 = 0.95;
const STARFIELD_MINIMUM_HEADER_VERSION: f32 = 0.96;

/// Supported titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameId {
    Morrowind,
    Oblivion,
    Nehrim,
    Skyrim,
    Enderal,
    SkyrimSE,
    EnderalSE,
    SkyrimVR,
    Fallout3,
    FalloutNV,
    Fallout4,
    Fallout4VR,
    Starfield,
}

/// Engine variant a title is built on. Shared between a base game and its
/// conversions/editions, and the granularity at which the sorting engine
/// works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameType {
    Tes3,
    Tes4,
    Tes5,
    Tes5Se,
    Tes5Vr,
    Fo3,
    Fonv,
    Fo4,
    Fo4Vr,
    Starfield,
}

impl GameId {
    /// All supported ids, in catalog order.
    pub fn all() -> &'static [GameId] {
        &[
            GameId::Morrowind,
            GameId::Oblivion,
            GameId::Nehrim,
            GameId::Skyrim,
            GameId::Enderal,
            GameId::SkyrimSE,
            GameId::EnderalSE,
            GameId::SkyrimVR,
            GameId::Fallout3,
            GameId::FalloutNV,
            GameId::Fallout4,
            GameId::Fallout4VR,
            GameId::Starfield,
        ]
    }

    /// Parse the `--game` CLI value.
    pub fn from_cli_name(name: &str) -> Result<Self> {
        let id = match name.to_ascii_lowercase().as_str() {
            "morrowind" => GameId::Morrowind,
            "oblivion" => GameId::Oblivion,
            "nehrim" => GameId::Nehrim,
            "skyrim" => GameId::Skyrim,
            "enderal" => GameId::Enderal,
            "skyrimse" => GameId::SkyrimSE,
            "enderalse" => GameId::EnderalSE,
            "skyrimvr" => GameId::SkyrimVR,
            "fallout3" => GameId::Fallout3,
            "falloutnv" => GameId::FalloutNV,
            "fallout4" => GameId::Fallout4,
            "fallout4vr" => GameId::Fallout4VR,
            "starfield" => GameId::Starfield,
            _ => return Err(Error::Argument(format!("invalid game name \"{}\"", name)).into()),
        };
        Ok(id)
    }

    /// Engine variant this title runs on.
    pub fn game_type(&self) -> GameType {
        match self {
            GameId::Morrowind => GameType::Tes3,
            GameId::Oblivion | GameId::Nehrim => GameType::Tes4,
            GameId::Skyrim | GameId::Enderal => GameType::Tes5,
            GameId::SkyrimSE | GameId::EnderalSE => GameType::Tes5Se,
            GameId::SkyrimVR => GameType::Tes5Vr,
            GameId::Fallout3 => GameType::Fo3,
            GameId::FalloutNV => GameType::Fonv,
            GameId::Fallout4 => GameType::Fo4,
            GameId::Fallout4VR => GameType::Fo4Vr,
            GameId::Starfield => GameType::Starfield,
        }
    }

    /// Full display name, e.g. "TES IV: Oblivion".
    pub fn display_name(&self) -> &'static str {
        match self {
            GameId::Morrowind => "TES III: Morrowind",
            GameId::Oblivion => "TES IV: Oblivion",
            GameId::Nehrim => "Nehrim - At Fate's Edge",
            GameId::Skyrim => "TES V: Skyrim",
            GameId::Enderal => "Enderal: Forgotten Stories",
            GameId::SkyrimSE => "TES V: Skyrim Special Edition",
            GameId::EnderalSE => "Enderal: Forgotten Stories (Special Edition)",
            GameId::SkyrimVR => "TES V: Skyrim VR",
            GameId::Fallout3 => "Fallout 3",
            GameId::FalloutNV => "Fallout: New Vegas",
            GameId::Fallout4 => "Fallout 4",
            GameId::Fallout4VR => "Fallout 4 VR",
            GameId::Starfield => "Starfield",
        }
    }

    /// The game's main master file.
    pub fn master_filename(&self) -> &'static str {
        match self {
            GameId::Morrowind => "Morrowind.esm",
            GameId::Oblivion => "Oblivion.esm",
            GameId::Nehrim => "Nehrim.esm",
            GameId::Skyrim
            | GameId::Enderal
            | GameId::SkyrimSE
            | GameId::EnderalSE
            | GameId::SkyrimVR => "Skyrim.esm",
            GameId::Fallout3 => "Fallout3.esm",
            GameId::FalloutNV => "FalloutNV.esm",
            GameId::Fallout4 | GameId::Fallout4VR => "Fallout4.esm",
            GameId::Starfield => "Starfield.esm",
        }
    }

    /// Lowest plugin header version the engine accepts for this title.
    pub fn minimum_header_version(&self) -> f32 {
        match self {
            GameId::Morrowind => MORROWIND_MINIMUM_HEADER_VERSION,
            GameId::Oblivion | GameId::Nehrim => OBLIVION_MINIMUM_HEADER_VERSION,
            GameId::Skyrim | GameId::Enderal | GameId::Fallout3 => {
                SKYRIM_FO3_MINIMUM_HEADER_VERSION
            }
            GameId::SkyrimSE | GameId::EnderalSE | GameId::SkyrimVR => {
                SKYRIM_SE_MINIMUM_HEADER_VERSION
            }
            GameId::FalloutNV => FONV_MINIMUM_HEADER_VERSION,
            GameId::Fallout4 | GameId::Fallout4VR => FO4_MINIMUM_HEADER_VERSION,
            GameId::Starfield => STARFIELD_MINIMUM_HEADER_VERSION,
        }
    }

    /// Per-game subdirectory name under the application data root.
    pub fn default_folder_name(&self) -> &'static str {
        match self {
            GameId::Morrowind => "Morrowind",
            GameId::Oblivion => "Oblivion",
            GameId::Nehrim => "Nehrim",
            GameId::Skyrim => "Skyrim",
            GameId::Enderal => "Enderal",
            GameId::SkyrimSE => "Skyrim Special Edition",
            GameId::EnderalSE => "Enderal Special Edition",
            GameId::SkyrimVR => "Skyrim VR",
            GameId::Fallout3 => "Fallout3",
            GameId::FalloutNV => "FalloutNV",
            GameId::Fallout4 => "Fallout4",
            GameId::Fallout4VR => "Fallout4VR",
            GameId::Starfield => "Starfield",
        }
    }

    /// Slug of the official masterlist repository for this title.
    pub fn masterlist_repo_slug(&self) -> &'static str {
        match self {
            GameId::Morrowind => "morrowind",
            GameId::Oblivion | GameId::Nehrim => "oblivion",
            GameId::Skyrim => "skyrim",
            GameId::Enderal | GameId::EnderalSE => "enderal",
            GameId::SkyrimSE => "skyrimse",
            GameId::SkyrimVR => "skyrimvr",
            GameId::Fallout3 => "fallout3",
            GameId::FalloutNV => "falloutnv",
            GameId::Fallout4 => "fallout4",
            GameId::Fallout4VR => "fallout4vr",
            GameId::Starfield => "starfield",
        }
    }

    /// Default masterlist URL for this title.
    pub fn default_masterlist_url(&self) -> String {
        default_masterlist_url_for_slug(self.masterlist_repo_slug())
    }
}

/// Raw masterlist URL for an official repository slug, on the current
/// default branch.
pub fn default_masterlist_url_for_slug(slug: &str) -> String {
    format!(
        "https://raw.githubusercontent.com/loot/{}/{}/masterlist.yaml",
        slug, DEFAULT_MASTERLIST_BRANCH
    )
}

impl GameType {
    /// Folder under the game install that holds plugin files.
    pub fn plugins_folder_name(&self) -> &'static str {
        match self {
            GameType::Tes3 => "Data Files",
            _ => "Data",
        }
    }

    /// Whether the engine variant supports light (ESL) plugins.
    pub fn supports_light_plugins(&self) -> bool {
        matches!(
            self,
            GameType::Tes5Se
                | GameType::Tes5Vr
                | GameType::Fo4
                | GameType::Fo4Vr
                | GameType::Starfield
        )
    }

    /// The base title built on this engine variant.
    pub fn base_id(&self) -> GameId {
        match self {
            GameType::Tes3 => GameId::Morrowind,
            GameType::Tes4 => GameId::Oblivion,
            GameType::Tes5 => GameId::Skyrim,
            GameType::Tes5Se => GameId::SkyrimSE,
            GameType::Tes5Vr => GameId::SkyrimVR,
            GameType::Fo3 => GameId::Fallout3,
            GameType::Fonv => GameId::FalloutNV,
            GameType::Fo4 => GameId::Fallout4,
            GameType::Fo4Vr => GameId::Fallout4VR,
            GameType::Starfield => GameId::Starfield,
        }
    }

    /// Name this engine variant goes by in the `type` key of legacy settings
    /// documents (the base game's folder name).
    pub fn settings_type_name(&self) -> &'static str {
        self.base_id().default_folder_name()
    }

    /// Parse a `type` value from a legacy settings document.
    pub fn from_settings_type_name(name: &str) -> Option<Self> {
        [
            GameType::Tes3,
            GameType::Tes4,
            GameType::Tes5,
            GameType::Tes5Se,
            GameType::Tes5Vr,
            GameType::Fo3,
            GameType::Fonv,
            GameType::Fo4,
            GameType::Fo4Vr,
            GameType::Starfield,
        ]
        .into_iter()
        .find(|t| t.settings_type_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_name_round_trip() {
        assert_eq!(GameId::from_cli_name("skyrimse").unwrap(), GameId::SkyrimSE);
        assert_eq!(GameId::from_cli_name("SkyrimSE").unwrap(), GameId::SkyrimSE);
        assert!(GameId::from_cli_name("daggerfall").is_err());
    }

    #[test]
    fn test_siblings_share_engine_type() {
        assert_eq!(GameId::Oblivion.game_type(), GameId::Nehrim.game_type());
        assert_eq!(GameId::Skyrim.game_type(), GameId::Enderal.game_type());
        assert_eq!(GameId::SkyrimSE.game_type(), GameId::EnderalSE.game_type());
    }

    #[test]
    fn test_default_masterlist_url() {
        assert_eq!(
            GameId::SkyrimSE.default_masterlist_url(),
            format!(
                "https://raw.githubusercontent.com/loot/skyrimse/{}/masterlist.yaml",
                DEFAULT_MASTERLIST_BRANCH
            )
        );
    }

    #[test]
    fn test_settings_type_vocabulary() {
        assert_eq!(
            GameType::from_settings_type_name("Skyrim Special Edition"),
            Some(GameType::Tes5Se)
        );
        assert_eq!(GameType::from_settings_type_name("Skyrim"), Some(GameType::Tes5));
        assert_eq!(GameType::from_settings_type_name("Enderal"), None);
    }

    #[test]
    fn test_light_plugin_support() {
        assert!(GameId::SkyrimSE.game_type().supports_light_plugins());
        assert!(!GameId::Skyrim.game_type().supports_light_plugins());
    }
}
