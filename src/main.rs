use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use signwall::config::Config;
use signwall::display::{self, DisplayRunner};
use signwall::domain::Lane;
use signwall::lanes::{SharedWorkingSet, WorkingSet};
use signwall::refresh::{RefreshSettings, Refresher};
use signwall::rotation::{LaneTally, RotationScheduler};
use signwall::source;

fn setup_logging(level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("signwall")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("signwall.log");

    // Setup env_logger with file output; the terminal belongs to the display
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        // Default: launch the wall
        None | Some(Commands::Run) => run_display(config).await,
        Some(Commands::Snapshot) => handle_snapshot_command(config).await,
        Some(Commands::Simulate { ticks, seed }) => handle_simulate_command(*ticks, *seed, config).await,
    }
}

fn refresher(config: &Config, working_set: SharedWorkingSet) -> Result<Refresher> {
    let source = source::from_config(&config.source).context("Failed to create snapshot source")?;
    Ok(Refresher::new(source, working_set, RefreshSettings::from(config)))
}

/// Fetch and classify a single snapshot
async fn fetch_working_set(config: &Config) -> Result<Arc<WorkingSet>> {
    let working_set = SharedWorkingSet::new();
    let refresher = refresher(config, working_set.clone())?;
    refresher.refresh().await.context("Failed to fetch snapshot")?;
    Ok(working_set.current())
}

async fn run_display(config: &Config) -> Result<()> {
    info!("Launching display");
    let working_set = SharedWorkingSet::new();
    let refresher = refresher(config, working_set.clone())?;

    let terminal = display::init_terminal().context("Failed to initialize terminal")?;
    let runner = DisplayRunner::new(terminal, config, working_set);
    let result = runner.run(refresher).await;

    // Restore the terminal even if the loop failed
    display::restore_terminal().context("Failed to restore terminal")?;
    result
}

async fn handle_snapshot_command(config: &Config) -> Result<()> {
    info!("Fetching single snapshot");
    let set = fetch_working_set(config).await?;

    println!("{}", "Snapshot".green().bold());
    println!("  {:<10} {}", "Recent:", set.recent().len().to_string().green());
    println!("  {:<10} {}", "Older:", set.older().len().to_string().blue());
    if set.has_archive_lane() {
        println!("  {:<10} {}", "Archive:", set.archive().len().to_string().cyan());
    } else {
        println!("  {:<10} {}", "Archive:", "(none)".dimmed());
    }
    println!("  {:<10} {}", "Total:", set.total_primary());
    if let Some(total) = set.total_archive() {
        println!("  {:<10} {}", "Archived:", total);
    }
    println!("  {:<10} {}", "Hash:", set.fingerprint().dimmed());
    Ok(())
}

async fn handle_simulate_command(ticks: u64, seed: Option<u64>, config: &Config) -> Result<()> {
    info!("Simulating {} ticks (seed: {:?})", ticks, seed);
    let set = fetch_working_set(config).await?;
    if set.is_empty() {
        println!("{}", "Snapshot is empty: every page would be the instruction page".yellow());
    }

    let mut scheduler = match seed {
        Some(seed) => RotationScheduler::seeded(config.rotation.clone(), seed),
        None => RotationScheduler::new(config.rotation.clone()),
    };
    let mut tally = LaneTally::new();
    for _ in 0..ticks {
        tally.record(&scheduler.advance(&set));
    }

    println!("{} {} ticks", "Simulated".green().bold(), tally.ticks());
    println!("  {:<12} {:>8} {:>8} {:>8}", "lane", "pages", "share", "target");
    for (lane, weight) in scheduler.config().weights.bands(set.has_archive_lane()) {
        println!(
            "  {:<12} {:>8} {:>7.2}% {:>7.2}%",
            lane.name(),
            tally.count(lane),
            tally.entry_share(lane) * 100.0,
            weight * 100.0
        );
    }

    let frequency = scheduler.config().instruction_page_frequency;
    let target = if frequency > 0 { 100.0 / frequency as f64 } else { 0.0 };
    println!(
        "  {:<12} {:>8} {:>7.2}% {:>7.2}%",
        Lane::Instruction.name(),
        tally.count(Lane::Instruction),
        tally.share(Lane::Instruction) * 100.0,
        target
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the level is known
    setup_logging(config.log_level.as_deref().unwrap_or("info")).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
