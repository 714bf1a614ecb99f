//! RTP simulator
//!
//! Usage:
//!   rf-slot-sim --preset gem_cascade --spins 1000000
//!   rf-slot-sim --config game.yaml --sessions 16 --seed 7 --json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use rf_slot_engine::{ConfigParser, GameConfig, SlotEngine, presets};
use rf_slot_sim::{SimulationConfig, SimulationReport, Simulator};

#[derive(Parser)]
#[command(name = "rf-slot-sim", about = "ReelForge slot RTP simulator")]
struct Cli {
    /// Game config file (.json, .yaml or .yml)
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in preset id
    #[arg(short, long, default_value = "gem_cascade")]
    preset: String,

    /// Spins per session
    #[arg(long, default_value_t = 100_000)]
    spins: u64,

    /// Parallel sessions (defaults to the CPU count)
    #[arg(long)]
    sessions: Option<usize>,

    /// Base seed; session i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stake per paid spin
    #[arg(long, default_value_t = 1.0)]
    stake: f64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let game = match &cli.config {
        Some(path) => load_config(path)?,
        None => match presets::by_id(&cli.preset) {
            Some(config) => config,
            None => {
                let known: Vec<String> = presets::all_presets().into_iter().map(|p| p.id).collect();
                bail!("Unknown preset '{}' (available: {})", cli.preset, known.join(", "));
            }
        },
    };
    let engine = SlotEngine::new(game).context("Invalid game config")?;

    let simulator = Simulator::new(SimulationConfig {
        spins_per_session: cli.spins,
        sessions: cli.sessions.unwrap_or_else(num_cpus::get),
        seed: cli.seed,
        stake: cli.stake,
    })?;
    let report = simulator.run(&engine).context("Simulation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parser = ConfigParser::new();
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let config = match extension.to_ascii_lowercase().as_str() {
        "json" => parser.parse_json(&text),
        "yaml" | "yml" => parser.parse_yaml(&text),
        other => bail!("Unsupported config extension '{other}' (expected json, yaml or yml)"),
    };
    config.with_context(|| format!("Failed to load {}", path.display()))
}

fn print_report(report: &SimulationReport) {
    let stats = &report.stats;
    println!("{} ({})", report.game_name, report.game_id);
    println!(
        "  sessions {} x {} spins, seed {}, stake {}",
        report.config.sessions,
        report.config.spins_per_session,
        report.config.seed,
        report.config.stake
    );
    println!(
        "  spins      {} ({} paid, {} free, {} respins)",
        stats.total_spins, stats.paid_spins, stats.free_spins, stats.respins
    );
    println!("  staked     {:.2}", stats.total_staked);
    println!("  returned   {:.2}", stats.total_returned);
    print!("  RTP        {:.4}%", stats.rtp() * 100.0);
    match report.rtp_deviation() {
        Some(deviation) => println!(
            " (target {:.2}%, {:+.4}%)",
            report.target_rtp.unwrap_or_default() * 100.0,
            deviation * 100.0
        ),
        None => println!(),
    }
    println!("  hit rate   {:.2}%", stats.hit_rate() * 100.0);
    println!("  max win    {:.1}x", stats.max_win_ratio);
    println!(
        "  cascades   {} chains, deepest {}, {} at limit",
        stats.cascade_chains, stats.deepest_cascade, stats.cascade_limit_hits
    );
    println!(
        "  features   {} meter, {} free-spin triggers ({} spins), {} respins, {} wheels",
        stats.meter_triggers,
        stats.free_spin_triggers,
        stats.free_spins_awarded,
        stats.respins_awarded,
        stats.bonus_wheels
    );
    println!("  speed      {:.0} spins/s", report.spins_per_second());
}
