use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;

use loadstone::engine::UnlinkedEngine;
use loadstone::games::GameId;
use loadstone::logging;
use loadstone::runner::{RunOptions, Runner};

/// Sorts a game's plugin load order through an external sorting engine.
///
/// The flag spelling is part of the interface to the invoking mod manager
/// and stays camelCase.
#[derive(Debug, Parser)]
#[command(name = "loadstone", version)]
struct Cli {
    /// Game to sort (e.g. SkyrimSE, Fallout4)
    #[arg(long)]
    game: String,

    /// Game installation directory
    #[arg(long = "gamePath")]
    game_path: PathBuf,

    /// Plugin order file; its directory is used as the profile directory
    #[arg(long = "pluginListPath")]
    plugin_list_path: PathBuf,

    /// Where to write the JSON report
    #[arg(long)]
    out: PathBuf,

    /// Do not refresh the masterlist before sorting
    #[arg(long = "skipUpdateMasterlist")]
    skip_update_masterlist: bool,

    /// trace, debug, info, warning or error
    #[arg(long = "logLevel", default_value = "info")]
    log_level: String,

    /// Language code for masterlist messages
    #[arg(long)]
    language: Option<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    logging::init(logging::level_from_str(&cli.log_level));

    let game = match GameId::from_cli_name(&cli.game) {
        Ok(game) => game,
        Err(err) => {
            error!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions {
        game,
        game_path: cli.game_path,
        plugin_list_path: cli.plugin_list_path,
        output_path: cli.out,
        update_masterlist: !cli.skip_update_masterlist,
        language: cli.language,
    };

    match Runner::new(options).and_then(|runner| runner.run(&UnlinkedEngine)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("sorting failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
