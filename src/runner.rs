//! Run orchestration
//!
//! One linear pass: resolve game metadata, migrate settings, update the
//! masterlist, load the metadata lists, reconcile the load order, sort,
//! write the new order, build the report. No stage is retried; the first
//! error aborts the run.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::engine::SortEngine;
use crate::error::Error;
use crate::games::GameId;
use crate::report::{self, RunStats};
use crate::settings::{legacy, AppPaths, GameSettings};
use crate::{fsutil, masterlist, plugins, APP_VERSION};

/// Stage markers written to stdout as `[progress] <n>`. The numeric values
/// are parsed by the invoking mod manager and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    CheckingMasterlistExistence = 1,
    UpdatingMasterlist = 2,
    LoadingLists = 3,
    ReadingPlugins = 4,
    SortingPlugins = 5,
    WritingLoadorder = 6,
    ParsingMessages = 7,
    Done = 8,
}

fn progress(p: Progress) {
    println!("[progress] {}", p as i32);
    let _ = std::io::stdout().flush();
}

/// Inputs for one orchestrated run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub game: GameId,
    pub game_path: PathBuf,
    pub plugin_list_path: PathBuf,
    pub output_path: PathBuf,
    pub update_masterlist: bool,
    pub language: Option<String>,
}

/// Drives every component of a run against an injected engine.
pub struct Runner {
    options: RunOptions,
    paths: AppPaths,
}

impl Runner {
    pub fn new(options: RunOptions) -> Result<Self> {
        let paths =
            AppPaths::new().context("failed to resolve the application data directory")?;
        Ok(Self { options, paths })
    }

    /// Run against an explicit data root instead of the platform one.
    pub fn with_paths(options: RunOptions, paths: AppPaths) -> Self {
        Self { options, paths }
    }

    pub fn run(&self, engine: &dyn SortEngine) -> Result<()> {
        let started = Instant::now();

        std::fs::create_dir_all(self.paths.root()).map_err(|source| Error::FileAccess {
            path: self.paths.root().to_path_buf(),
            source,
        })?;

        let (mut settings, language) = self.resolve_settings(&engine.default_language())?;
        settings.set_game_path(&self.options.game_path);

        let profile_dir = self
            .options
            .plugin_list_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut handle =
            engine.create_game_handle(settings.game_type(), settings.game_path(), &profile_dir)?;

        let masterlist_path = self.paths.masterlist_file(settings.folder_name());
        if self.options.update_masterlist {
            progress(Progress::CheckingMasterlistExistence);
            fsutil::ensure_parent_dir(&masterlist_path)?;

            progress(Progress::UpdatingMasterlist);
            masterlist::update(&masterlist_path, settings.masterlist_source())?;
        }

        progress(Progress::LoadingLists);
        let userlist_path = self.paths.userlist_file(settings.folder_name());
        let userlist = userlist_path.is_file().then_some(userlist_path.as_path());
        handle.database().load_lists(&masterlist_path, userlist)?;

        progress(Progress::ReadingPlugins);
        let entries = plugins::reconcile_load_order(
            &self.options.plugin_list_path,
            &settings.data_path(),
            handle.as_ref(),
        )?;
        let names: Vec<String> = entries.into_iter().map(|e| e.name).collect();

        progress(Progress::SortingPlugins);
        handle.load_current_load_order_state()?;
        let sorted = handle.sort_plugins(&names)?;
        info!("sorted {} plugins", sorted.len());

        progress(Progress::WritingLoadorder);
        plugins::write_load_order(&self.options.plugin_list_path, &sorted)?;

        progress(Progress::ParsingMessages);
        let stats = RunStats {
            elapsed_ms: started.elapsed().as_millis() as u64,
            tool_version: APP_VERSION.to_string(),
            engine_version: engine.version(),
        };
        let report = report::build_report(&sorted, handle.as_mut(), &language, stats)?;
        report::write_report(&self.options.output_path, &report)?;

        progress(Progress::Done);
        Ok(())
    }

    /// Catalog defaults, overridden by the first matching entry of the
    /// legacy settings document if one exists. The `--language` flag beats
    /// the document's language key.
    fn resolve_settings(&self, default_language: &str) -> Result<(GameSettings, String)> {
        let mut settings = GameSettings::new(self.options.game);
        let mut language = default_language.to_string();

        let settings_file = self.paths.settings_file();
        if settings_file.is_file() {
            let document = legacy::load_document(&settings_file)?;
            let outcome = legacy::migrate(&document, self.options.game);
            if let Some(migrated) = outcome.settings {
                debug!("applying legacy settings overrides for {}", migrated.name());
                settings = migrated;
            }
            if let Some(doc_language) = outcome.language {
                language = doc_language;
            }
        }

        if let Some(flag) = &self.options.language {
            language = flag.clone();
        }
        if language != default_language {
            debug!("selected language: {}", language);
        }

        Ok((settings, language))
    }
}
