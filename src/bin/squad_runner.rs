//! Headless Squad Runner
//!
//! Loads a battlefield scenario from JSON, runs the combat commander for a
//! number of ticks and prints the resulting squads.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use squad_commander::battlefield::BattlefieldSnapshot;
use squad_commander::commander::{CombatCommander, TimedEvent};
use squad_commander::core::{load_config, CommanderConfig, Result};
use squad_commander::squad::{SquadOrderKind, SquadPriority};
use squad_commander::units::Agent;

/// Headless Squad Runner - replay a battlefield snapshot through the commander
#[derive(Parser, Debug)]
#[command(name = "squad_runner")]
#[command(about = "Run the combat commander over a JSON scenario and print its squads")]
struct Args {
    /// Scenario file (see data/scenarios/)
    #[arg(long, default_value = "data/scenarios/skirmish.json")]
    scenario: PathBuf,

    /// TOML config overriding the scenario's own
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to run
    #[arg(long, default_value_t = 24)]
    ticks: u64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Deserialize)]
struct Scenario {
    #[serde(default)]
    config: CommanderConfig,
    battlefield: BattlefieldSnapshot,
    /// Agents offered to the squad layer every tick
    combat_units: Vec<Agent>,
}

#[derive(Serialize)]
struct SquadReport {
    name: String,
    priority: SquadPriority,
    order: SquadOrderKind,
    label: String,
    x: i32,
    y: i32,
    radius: i32,
    members: Vec<u32>,
}

#[derive(Serialize)]
struct RunReport {
    ticks: u64,
    aggressive: bool,
    recon_target: Option<(i32, i32)>,
    squads: Vec<SquadReport>,
    events: Vec<TimedEvent>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let contents = fs::read_to_string(&args.scenario)?;
    let scenario: Scenario = serde_json::from_str(&contents)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => scenario.config,
    };

    tracing::info!(scenario = %args.scenario.display(), ticks = args.ticks, "Running scenario");

    let mut commander = CombatCommander::new(scenario.battlefield, config)?;
    let mut events = Vec::new();
    for tick in 0..args.ticks {
        let log = commander.update(tick, &scenario.combat_units)?;
        events.extend(log.events().iter().cloned());
    }

    let mut squads: Vec<SquadReport> = commander
        .squads()
        .squads()
        .map(|squad| {
            let order = squad.order();
            SquadReport {
                name: squad.name().to_string(),
                priority: squad.priority(),
                order: order.kind(),
                label: order.label().to_string(),
                x: order.position().x,
                y: order.position().y,
                radius: order.radius(),
                members: squad.members().iter().map(|id| id.0).collect(),
            }
        })
        .collect();
    squads.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));

    let report = RunReport {
        ticks: args.ticks,
        aggressive: commander.is_aggressive(),
        recon_target: commander.recon_target().map(|p| (p.x, p.y)),
        squads,
        events,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &RunReport) {
    println!("Squads after {} ticks", report.ticks);
    println!("=====================");
    println!("Aggressive: {}", report.aggressive);
    match report.recon_target {
        Some((x, y)) => println!("Recon target: ({}, {})", x, y),
        None => println!("Recon target: none"),
    }
    println!();
    for squad in &report.squads {
        println!(
            "{:<14} {:?} {:?} \"{}\" at ({}, {}) r={}",
            squad.name, squad.priority, squad.order, squad.label, squad.x, squad.y, squad.radius
        );
        println!("    members: {:?}", squad.members);
    }
    println!();
    println!("{} events", report.events.len());
    for timed in &report.events {
        println!("  [{}] {:?}", timed.tick, timed.event);
    }
}
