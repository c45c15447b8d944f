//! rewind: step a stopped node's persisted state back by one height.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use rewind_privval::PrivValidatorConfig;
use rewind_state::{rollback, BuildVersion, StoreAlignment, StoreStatus};
use rewind_store_lmdb::{LmdbBlockStore, LmdbStateStore};
use rewind_utils::{init_tracing, LogFormat};

use config::{NodePaths, RewindConfig};

#[derive(Parser)]
#[command(name = "rewind", version, about = "Roll a node's state back by one height")]
struct Cli {
    /// Node home directory; relative config paths resolve against it.
    #[arg(long, default_value = "./rewind_home", env = "REWIND_HOME")]
    home: PathBuf,

    /// Path to a TOML configuration file. Defaults to
    /// `<home>/config/rewind.toml` when that file exists.
    #[arg(long, env = "REWIND_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory override.
    #[arg(long, env = "REWIND_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "REWIND_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, env = "REWIND_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Overwrite the state at height n with the state at n - 1.
    ///
    /// The node must be stopped. Application state is not touched: after a
    /// plain rollback the node re-executes block n on restart.
    Rollback {
        /// Also delete block n from the block store and reset the
        /// validator's signing checkpoint.
        #[arg(long)]
        hard: bool,
    },
    /// Print both store heights and how they relate.
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = RewindConfig::load(&cli.home, cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.log_json {
        config.log_format = LogFormat::Json;
    }

    init_tracing(config.log_format, &config.log_level);

    let paths = config.resolve(&cli.home);
    tracing::debug!(home = %cli.home.display(), ?paths, "resolved node paths");

    match cli.command {
        Command::Rollback { hard } => run_rollback(&paths, config.map_size, hard),
        Command::Status => run_status(&paths, config.map_size),
    }
}

fn open_stores(
    paths: &NodePaths,
    map_size: usize,
) -> anyhow::Result<(LmdbBlockStore, LmdbStateStore)> {
    // Opening an environment creates it.
    require_dir(&paths.block_dir)?;
    require_dir(&paths.state_dir)?;

    let block_store = LmdbBlockStore::open(&paths.block_dir, map_size)
        .with_context(|| format!("failed to open block store at {}", paths.block_dir.display()))?;
    let state_store = LmdbStateStore::open(&paths.state_dir, map_size)
        .with_context(|| format!("failed to open state store at {}", paths.state_dir.display()))?;
    Ok((block_store, state_store))
}

fn require_dir(path: &Path) -> anyhow::Result<()> {
    if !path.is_dir() {
        bail!("store directory {} does not exist", path.display());
    }
    Ok(())
}

fn run_rollback(paths: &NodePaths, map_size: usize, hard: bool) -> anyhow::Result<()> {
    let (block_store, state_store) = open_stores(paths, map_size)?;
    let privval = PrivValidatorConfig::new(paths.key_file.clone(), paths.state_file.clone());

    let outcome = rollback(
        &block_store,
        &state_store,
        hard,
        &privval,
        &BuildVersion::current(),
    )
    .context("failed to rollback state")?;

    println!(
        "Rolled back state to height {} and hash {}",
        outcome.height, outcome.app_hash
    );
    Ok(())
}

fn run_status(paths: &NodePaths, map_size: usize) -> anyhow::Result<()> {
    let (block_store, state_store) = open_stores(paths, map_size)?;
    let status = StoreStatus::read(&block_store, &state_store)?;

    println!("state height:      {}", status.state_height);
    println!("blockstore base:   {}", status.block_base);
    println!("blockstore height: {}", status.block_height);
    match status.alignment() {
        Ok(StoreAlignment::PendingBlock) => {
            println!("alignment:         pending block (state one behind)")
        }
        Ok(StoreAlignment::Aligned) => println!("alignment:         aligned"),
        Err(e) => println!("alignment:         inconsistent: {e}"),
    }
    Ok(())
}
