mod commands;
mod config;
mod render;
mod runner;

use std::time::Duration;

use clap::Parser;
use common::games::SessionRng;
use common::games::candy::{CandySession, LevelTable};
use common::progress::{FileProgressStore, MemoryProgressStore, ProgressStore};
use common::version::VERSION;
use common::{log, logger};

use config::{CONFIG_FILE, Config, get_config_manager};

#[derive(Parser)]
#[command(name = "candy_client", version)]
struct Args {
    /// YAML config file; missing file means defaults
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,

    /// Start at this level instead of the saved one
    #[arg(long)]
    level: Option<u32>,

    /// Seed for board generation, to replay a session
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,

    /// Print the level table and exit
    #[arg(long)]
    list_levels: bool,

    /// Keep progress in memory only
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = get_config_manager(&args.config).get_config_or_default();
    log!("Candy client {} (config {})", VERSION, args.config);

    if args.list_levels {
        print!("{}", render::render_level_table(&LevelTable::new(config.engine.level_count)));
        return Ok(());
    }

    let seed: u64 = args.seed.unwrap_or_else(rand::random);

    if args.no_save || !config.progress.save {
        play(MemoryProgressStore::in_memory(), &config, seed, args.level).await
    } else {
        let store = FileProgressStore::from_file(config.progress.location.as_str());
        play(store, &config, seed, args.level).await
    }
}

async fn play<S: ProgressStore>(
    store: S,
    config: &Config,
    seed: u64,
    level: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = CandySession::resume(config.engine, store, SessionRng::new(seed))?;
    if let Some(level) = level {
        session.start_level(level)?;
    }

    runner::run_session(session, Duration::from_millis(config.tick_interval_ms)).await
}
