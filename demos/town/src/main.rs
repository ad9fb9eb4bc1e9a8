//! town: a small tile-grid town for the tilecity simulation.
//!
//! Twelve citizens in four houses find jobs and schools, commute along the
//! roads, shop, repair broken utilities, age, have children, and die.  Run
//! with `RUST_LOG=tc_behavior=debug` to watch individual plans.

mod town;

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tc_agent::{load_citizens_csv, load_citizens_reader, CitizenStore};
use tc_behavior::SimEvent;
use tc_core::Tick;
use tc_registry::BuildingRegistry;
use tc_sim::{SimBuilder, SimObserver, SimSettings};
use tc_spatial::AStarPathFinder;

/// Population used when no `--citizens` file is given.
const DEFAULT_CITIZENS: &str = include_str!("../data/citizens.csv");

/// Run the demo town.
#[derive(Parser, Debug)]
#[command(name = "town")]
#[command(about = "Simulate a small tile-grid town and print what happened")]
struct Args {
    /// Settings TOML with optional [sim] and [behavior] tables
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Population CSV (x,y,age,profession,education,nav,ticks_per_tile,home_x,home_y)
    #[arg(long)]
    citizens: Option<PathBuf>,

    /// Days to simulate; overrides sim.total_ticks
    #[arg(long)]
    days: Option<u64>,

    /// Random seed; overrides sim.seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the town map before and after the run
    #[arg(long)]
    show_map: bool,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Tallies events and logs a population line at every snapshot.
#[derive(Default)]
struct Tally {
    ticks_per_day: u64,
    hired:         usize,
    enrolled:      usize,
    graduated:     usize,
    visits:        usize,
    breakdowns:    usize,
    repairs:       usize,
    failed_tasks:  usize,
    born:          usize,
    died:          usize,
}

impl SimObserver for Tally {
    fn on_tick_end(&mut self, _tick: Tick, events: &[SimEvent]) {
        for e in events {
            match e {
                SimEvent::Hired { .. }         => self.hired += 1,
                SimEvent::Enrolled { .. }      => self.enrolled += 1,
                SimEvent::Graduated { .. }     => self.graduated += 1,
                SimEvent::Visited { .. }       => self.visits += 1,
                SimEvent::UtilityFailed { .. } => self.breakdowns += 1,
                SimEvent::Repaired { .. }      => self.repairs += 1,
                SimEvent::TaskFailed { .. }    => self.failed_tasks += 1,
                SimEvent::Born { .. }          => self.born += 1,
                SimEvent::Died { .. }          => self.died += 1,
                _ => {}
            }
        }
    }

    fn on_snapshot(&mut self, tick: Tick, citizens: &CitizenStore, _registry: &BuildingRegistry) {
        let employed = citizens.iter().filter(|c| c.workplace.is_some()).count();
        let studying = citizens.iter().filter(|c| c.study_place.is_some()).count();
        info!(
            day = tick.0 / self.ticks_per_day.max(1),
            population = citizens.len(),
            employed,
            studying,
            "snapshot"
        );
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!(%final_tick, "simulation finished");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("town=info,tc_sim=info")),
        )
        .init();

    let args = Args::parse();

    // 1. Settings.
    let mut settings = match &args.settings {
        Some(path) => SimSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => SimSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.sim.seed = seed;
    }
    let ticks_per_day = settings.sim.make_clock().ticks_per_day();
    if let Some(days) = args.days {
        settings.sim.total_ticks = days * ticks_per_day;
    }

    // 2. Town.
    let (map, registry) = town::build_town(settings.sim.ticks_per_hour)?;
    info!(width = map.width(), height = map.height(), buildings = registry.len(), "town built");
    if args.show_map {
        for row in town::render(&map, &registry) {
            println!("{row}");
        }
        println!();
    }

    // 3. Population.
    let population = match &args.citizens {
        Some(path) => load_citizens_csv(path)
            .with_context(|| format!("loading citizens from {}", path.display()))?,
        None => load_citizens_reader(Cursor::new(DEFAULT_CITIZENS))?,
    };
    info!(citizens = population.len(), "population loaded");

    // 4. Run.
    let days = settings.sim.total_ticks / ticks_per_day.max(1);
    let mut sim = SimBuilder::new(settings.sim.clone(), map, registry, AStarPathFinder)
        .settings(settings)
        .citizens(population)
        .build()?;

    let mut tally = Tally { ticks_per_day, ..Tally::default() };
    let started = Instant::now();
    sim.run(&mut tally)?;
    let elapsed = started.elapsed();

    // 5. Summary.
    let census = sim.census();
    println!();
    println!("=== town — {days} day(s), {} ticks in {:.2?} ===", sim.tick().0, elapsed);
    println!(
        "Population {}  |  employed {}  |  students {}  |  homeless {}",
        census.population, census.employed, census.students, census.homeless
    );
    println!(
        "Hired {}  |  enrolled {}  |  graduated {}  |  shop visits {}",
        tally.hired, tally.enrolled, tally.graduated, tally.visits
    );
    println!(
        "Breakdowns {}  |  repairs {}  |  failed tasks {}  |  born {}  |  died {}",
        tally.breakdowns, tally.repairs, tally.failed_tasks, tally.born, tally.died
    );
    println!();
    println!("{:<28} count", "state");
    for (state, count) in census.by_state.iter().filter(|(_, n)| *n > 0) {
        println!("{:<28} {count}", state.as_str());
    }
    println!();
    println!("{:>4} {:>4} {:<12} {:<11} {:<28}", "id", "age", "profession", "education", "state");
    for c in sim.citizens.iter() {
        println!(
            "{:>4} {:>4} {:<12} {:<11} {:<28}",
            c.id.0,
            c.age,
            c.profession.as_str(),
            c.education.as_str(),
            c.state.as_str()
        );
    }

    if args.show_map {
        println!();
        for row in town::render(&sim.map, &sim.registry) {
            println!("{row}");
        }
    }
    Ok(())
}
