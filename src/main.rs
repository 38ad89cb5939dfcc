use botnav::config;
use botnav::harness::{Skirmish, SkirmishConfig};
use botnav::logging;
use botnav::{ArenaBounds, CoreConfig, TargetingStrategyKind};
use clap::Parser;
use log::{error, info, warn};
use std::process;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about = "Headless skirmish driving the botnav core", long_about = None)]
struct Args {
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = config::DEFAULT_TICKS)]
    ticks: u32,

    /// Seed for enemy spawns, movement and bullet outcomes.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Arena width.
    #[arg(long, default_value_t = config::DEFAULT_ARENA_WIDTH)]
    width: f64,

    /// Arena height.
    #[arg(long, default_value_t = config::DEFAULT_ARENA_HEIGHT)]
    height: f64,

    /// Number of enemies.
    #[arg(long, default_value_t = config::DEFAULT_ENEMIES)]
    enemies: usize,

    /// Distance from a wall at which avoidance turns begin.
    #[arg(long, default_value_t = config::DEFAULT_PERIMETER)]
    perimeter: f64,

    /// Targeting score formula (inverse-sum, cosine-decay).
    #[arg(long, default_value = "inverse-sum")]
    strategy: TargetingStrategyKind,

    /// Debug filter to specify log topics (e.g., "tracker,avoid,target")
    /// Available topics: geometry, walls, avoid, tracker, target, stats, agent
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if let Some(filter) = &args.debug_filter {
        for topic in filter.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !logging::TOPICS.contains(&topic) {
                warn!("Unknown debug topic '{}'", topic);
            }
        }
    }

    let bounds = match ArenaBounds::new(args.width, args.height) {
        Ok(bounds) => bounds,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    let skirmish_config = SkirmishConfig {
        ticks: args.ticks,
        seed: args.seed,
        bounds,
        enemies: args.enemies,
        core: CoreConfig {
            perimeter: args.perimeter,
            strategy: args.strategy,
            ..Default::default()
        },
    };

    info!("Starting skirmish...");
    let report = match Skirmish::new(skirmish_config).and_then(Skirmish::run) {
        Ok(report) => report,
        Err(e) => {
            error!("Skirmish failed: {}", e);
            process::exit(1);
        }
    };

    for line in report.to_string().lines() {
        info!("{}", line);
    }
}
