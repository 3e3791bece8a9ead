//! Headless locomotion sandbox.
//!
//! Loads a TOML scenario, builds the static Rapier world, drives one actor through the
//! scripted input segments and prints one JSON line per reported tick on stdout.

mod scenario;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use locomotion::{MovementController, RapierQueryWorld, TickReport};
use log::LevelFilter;
use serde::Serialize;

use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "sandbox")]
#[command(about = "Run a scripted locomotion scenario against a static world")]
struct Args {
    /// Scenario file (TOML)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Log verbosity on stderr. `RUST_LOG` overrides it.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Print every Nth tick. Ticks with a state transition are always printed.
    #[arg(long, default_value_t = 1)]
    every: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Serialize)]
struct TraceLine<'a> {
    tick: u64,
    time: f32,
    segment: usize,
    #[serde(flatten)]
    report: &'a TickReport,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let scenario = Scenario::load(&args.scenario)?;
    let dt = scenario.dt();
    log::info!(
        "scenario {}: {} statics, {} segments at {} Hz",
        args.scenario.display(),
        scenario.statics.len(),
        scenario.segments.len(),
        scenario.tick_rate
    );

    let world = RapierQueryWorld::build(scenario.world_defs());
    let mut actor = MovementController::new(scenario.config.clone(), scenario.actor.spawn_point())?;
    let every = u64::from(args.every.max(1));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut tick: u64 = 0;

    for (index, segment) in scenario.segments.iter().enumerate() {
        let view = segment.view(scenario.camera_yaw_deg);
        // Rebuilt per segment: the query borrows the world immutably.
        let query = world.collision_query(actor.config());

        for i in 0..segment.tick_count(dt) {
            let input = segment.input(i == 0);
            let report = actor.tick(&query, &input, &view, dt);
            tick += 1;

            if let Some(t) = report.transition {
                log::info!("tick {tick}: {} -> {}", t.from, t.to);
            }
            if tick % every == 0 || report.transition.is_some() {
                let line = TraceLine {
                    tick,
                    time: tick as f32 * dt,
                    segment: index,
                    report: &report,
                };
                serde_json::to_writer(&mut out, &line)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;

    let last = actor.snapshot();
    log::info!(
        "finished after {tick} ticks in {} at ({:.2}, {:.2}, {:.2})",
        last.state_name,
        last.position.x,
        last.position.y,
        last.position.z
    );
    Ok(())
}
