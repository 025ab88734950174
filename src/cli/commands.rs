//! CLI command implementations
//!
//! Every command loads the configuration, opens the directory store under
//! the configured data directory and works through a
//! `HistoryRetentionManager`. Results are written as one JSON object on
//! stdout, except `show` without `--output`, which writes raw bytes.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::{Config, LogFormat};
use crate::configure::{ConfigureAction, SaveRequest};
use crate::logging::init_logging;
use crate::retention::{HistoryLength, HistoryRetentionManager, Snapshot};
use crate::store::DirStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_blob, write_blob, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init {
            config,
            data_dir,
            history_length,
        } => init(&config, &data_dir, history_length.as_deref()),
        Command::Configure {
            config,
            history_length,
            snapshot,
        } => configure(&config, &history_length, snapshot.as_deref()),
        Command::Push { config, file } => push(&config, file.as_deref()),
        Command::List { config } => list(&config),
        Command::Show {
            config,
            sequence,
            output,
        } => show(&config, sequence, output.as_deref()),
        Command::Prune { config } => prune(&config),
    }
}

/// Load configuration and start logging in the configured format
fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    init_logging(config.log_format);
    Ok(config)
}

fn open_manager(config: &Config) -> CliResult<HistoryRetentionManager<DirStore>> {
    let store = DirStore::open(config.data_path())?;
    Ok(HistoryRetentionManager::open(store, config.history_length)?)
}

fn snapshot_summary(snapshot: &Snapshot) -> Value {
    json!({
        "sequence": snapshot.sequence(),
        "created_at": snapshot.created_at().to_rfc3339(),
        "size": snapshot.size(),
    })
}

/// Write a configuration file and create the history directory
///
/// Fails if the configuration file already exists.
pub fn init(config_path: &Path, data_dir: &Path, history_length: Option<&str>) -> CliResult<()> {
    init_logging(LogFormat::Text);

    if config_path.exists() {
        return Err(CliError::already_initialized(config_path.display()));
    }

    let mut config = Config::new(data_dir);
    if let Some(length) = history_length {
        config.history_length = HistoryLength::parse(length)?;
    }

    let store = DirStore::open(config.data_path())?;
    config.save(config_path)?;

    write_response(json!({
        "config": config_path.display().to_string(),
        "history_dir": store.root().display().to_string(),
        "history_length": config.history_length.get(),
    }))
}

/// Save a new history length, record the optional snapshot, then prune
pub fn configure(
    config_path: &Path,
    history_length: &str,
    snapshot_path: Option<&Path>,
) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    let snapshot = snapshot_path.map(|p| read_blob(Some(p))).transpose()?;

    let manager = open_manager(&config)?;
    let outcome = ConfigureAction::new(&manager, &mut config, config_path).save(SaveRequest {
        history_length,
        snapshot,
    })?;

    write_response(json!({
        "history_length": outcome.history_length.get(),
        "recorded": outcome.recorded,
        "evicted": outcome.evicted + manager.evicted_on_open(),
        "retained": manager.len(),
    }))
}

/// Record a snapshot read from a file or stdin
pub fn push(config_path: &Path, file: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let blob = read_blob(file)?;

    let manager = open_manager(&config)?;
    let sequence = manager.record_snapshot(blob)?;

    write_response(json!({
        "sequence": sequence,
        "retained": manager.len(),
    }))
}

/// List retained snapshots, oldest first
pub fn list(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let manager = open_manager(&config)?;

    let entries: Vec<Value> = manager.list_history().iter().map(snapshot_summary).collect();
    write_response(json!({
        "history_length": manager.history_length().get(),
        "snapshots": entries,
    }))
}

/// Write one snapshot's blob to a file or stdout
pub fn show(config_path: &Path, sequence: u64, output: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let manager = open_manager(&config)?;

    let snapshot = manager
        .get(sequence)
        .ok_or_else(|| CliError::not_found(sequence))?;
    write_blob(output, snapshot.blob())?;

    match output {
        Some(path) => {
            let mut summary = snapshot_summary(&snapshot);
            summary["output"] = json!(path.display().to_string());
            write_response(summary)
        }
        None => Ok(()),
    }
}

/// Drop snapshots beyond the history length
///
/// Entries over the bound are already evicted while opening the history, so
/// those are counted together with what the explicit prune removes.
pub fn prune(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let manager = open_manager(&config)?;
    let evicted = manager.evicted_on_open() + manager.prune()?;

    write_response(json!({
        "evicted": evicted,
        "retained": manager.len(),
    }))
}
