//! Colony Sim - headless driver
//!
//! Sets up the starting colony (two citizens, a food building, scattered
//! jobs and a few construction orders), runs a fixed number of ticks and
//! prints the citizens' status as it goes.

use std::path::PathBuf;

use clap::Parser;
use colony_sim::core::error::Result;
use colony_sim::core::SimulationConfig;
use colony_sim::ecs::{BuildingType, JobKind};
use colony_sim::simulation::{Activity, Simulation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless colony simulation
#[derive(Parser, Debug)]
#[command(name = "colony-sim")]
#[command(about = "Run the colony simulation without a display")]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// TOML config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for job placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Generic jobs to scatter over the field
    #[arg(long, default_value_t = 6)]
    jobs: usize,

    /// Print a status block every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Dump the final state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FinalState {
    tick: u64,
    citizens: Vec<colony_sim::simulation::CitizenSnapshot>,
    jobs: Vec<colony_sim::simulation::JobSnapshot>,
    buildings: Vec<colony_sim::simulation::BuildingSnapshot>,
    building_queue: Vec<colony_sim::ecs::Entity>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("colony_sim=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut sim = Simulation::new(config)?;
    spawn_initial_colony(&mut sim, &args);

    for _ in 0..args.ticks {
        sim.step(args.dt);
        if args.report_every > 0 && sim.current_tick() % args.report_every == 0 {
            display_status(&sim);
        }
    }

    if args.json {
        let state = FinalState {
            tick: sim.current_tick(),
            citizens: sim.citizens(),
            jobs: sim.jobs(),
            buildings: sim.buildings(),
            building_queue: sim.building_queue(),
        };
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    Ok(())
}

/// Spawn the starting colony
fn spawn_initial_colony(sim: &mut Simulation, args: &Args) {
    let width = sim.config().grid_width as f32 * sim.config().cell_size;
    let height = sim.config().grid_height as f32 * sim.config().cell_size;
    let cell = sim.config().cell_size;

    sim.spawn_citizen(width * 0.25, height * 0.5);
    sim.spawn_citizen(width * 0.75, height * 0.5);
    sim.spawn_food_building(width * 0.5, height * 0.6);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for _ in 0..args.jobs {
        let kind = JobKind::GENERIC[rng.gen_range(0..JobKind::GENERIC.len())];
        let priority = rng.gen_range(0..10);
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);
        sim.spawn_job(x, y, kind, priority);
    }

    // Construction orders snap to the grid like the placement indicator did
    for (i, building_type) in BuildingType::CONSTRUCTIBLE.into_iter().enumerate() {
        let col = (sim.config().grid_width / 4) * (i as i32 + 1);
        let row = sim.config().grid_height / 4;
        sim.spawn_building_job(col as f32 * cell, row as f32 * cell, building_type);
    }

    tracing::info!(
        "Spawned colony: 2 citizens, {} jobs, {} building orders",
        args.jobs,
        sim.building_queue().len()
    );
}

/// Print one status line per citizen
fn display_status(sim: &Simulation) {
    println!();
    println!(
        "--- Tick {} | Jobs: {} | Buildings: {} ---",
        sim.current_tick(),
        sim.jobs().len(),
        sim.buildings().len()
    );
    for (index, citizen) in sim.citizens().iter().enumerate() {
        let status = match citizen.activity {
            Activity::Idle => "Idle".to_string(),
            Activity::Walking { remaining } => format!("Walking: {:.0} px to go", remaining),
            Activity::Working { progress } => format!("Working: {:.1}%", progress * 100.0),
            Activity::Stalled => "Stalled: no route".to_string(),
        };
        println!(
            "Citizen {}: Hunger: {:.1} | {}",
            index + 1,
            citizen.hunger,
            status
        );
    }
}
