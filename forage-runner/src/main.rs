mod console;

use clap::Parser;
use console::ConsoleCommand;
use crossbeam_channel::{Receiver, TryRecvError};
use forage_config::{load_or_create, Config};
use forage_core::Ticker;
use forage_simulation::{SimulationConfig, World};
use forage_transport::{CabbageRecord, GoatRecord, TransportController};
use hdrhistogram::Histogram;
use log::{debug, error, info, warn};
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the simulation configuration file, created with defaults when missing
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Seed overriding the one in the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many completed ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Start paused
    #[arg(long)]
    paused: bool,

    /// Advance a virtual clock instead of sleeping between ticks
    #[arg(long)]
    unpaced: bool,

    /// Log a population summary every N ticks (0 disables)
    #[arg(long, default_value_t = 500)]
    stats_every: u64,
}

/// Wall clock, or a virtual one that jumps forward instead of sleeping.
struct Clock {
    origin: Instant,
    offset: Duration,
    unpaced: bool,
}

impl Clock {
    fn new(unpaced: bool) -> Self {
        Self {
            origin: Instant::now(),
            offset: Duration::ZERO,
            unpaced,
        }
    }

    fn now(&self) -> Instant {
        if self.unpaced {
            self.origin + self.offset
        } else {
            Instant::now()
        }
    }

    fn wait(&mut self, duration: Duration) {
        if self.unpaced {
            self.offset += duration;
        } else if !duration.is_zero() {
            spin_sleep::sleep(duration);
        }
    }
}

fn simulation_config(config: &Config, seed: Option<u64>) -> SimulationConfig {
    let [min_size, max_size] = config.cabbage_size_range;
    SimulationConfig {
        width: config.window_width,
        height: config.window_height,
        initial_goats: config.num_goats,
        initial_cabbages: config.num_cabbages,
        spawn_choices: config.spawn_choices(),
        spawn_margin: config.cabbage_margin,
        cabbage_size_range: (min_size, max_size),
        seed: seed.or(config.seed),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Applies every queued console command. Returns `Quit` when asked to stop.
fn drain_commands(commands: &Receiver<ConsoleCommand>, world: &mut World) -> Flow {
    loop {
        match commands.try_recv() {
            Ok(ConsoleCommand::Quit) => return Flow::Quit,
            Ok(ConsoleCommand::Inspect(point)) => inspect(world, point.x, point.y),
            Ok(ConsoleCommand::World(command)) => match world.apply(command) {
                Ok(outcome) => info!("{:?}", outcome),
                Err(e) => warn!("Command rejected: {}", e),
            },
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Flow::Continue,
        }
    }
}

/// Cabbages take precedence over goats under the same point.
fn inspect(world: &World, x: f32, y: f32) {
    let point = glam::Vec2::new(x, y);
    let described = if let Some(id) = world.cabbage_at(point) {
        world
            .cabbage(id)
            .map(|cabbage| serde_json::to_string(&CabbageRecord::new(id, cabbage)))
    } else if let Some(id) = world.goat_at(point) {
        world.goat(id).map(|goat| serde_json::to_string(&GoatRecord::new(id, goat)))
    } else {
        None
    };

    match described {
        Some(Ok(json)) => info!("{}", json),
        Some(Err(e)) => warn!("Could not describe entity: {}", e),
        None => info!("Nothing at ({:.1}, {:.1})", x, y),
    }
}

fn log_summary(histogram: &Histogram<u64>) {
    if histogram.len() == 0 {
        info!("No ticks were run");
        return;
    }
    info!(
        "Tick duration over {} ticks: p50 {}us, p99 {}us, max {}us",
        histogram.len(),
        histogram.value_at_quantile(0.5),
        histogram.value_at_quantile(0.99),
        histogram.max()
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = load_or_create(&args.config).map_err(|e| {
        error!("Failed to load config {}: {}", args.config.display(), e);
        e
    })?;
    info!("Using configuration from {}", args.config.display());

    let mut world = World::new(&simulation_config(&config, args.seed));
    if args.paused {
        world.pause();
    }

    let mut transport = TransportController::from_settings(&config.transport)?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;

    let commands = console::spawn_reader();

    let tick_budget = Duration::from_millis(config.tick_interval_ms);
    let mut clock = Clock::new(args.unpaced);
    let mut ticker = Ticker::new(tick_budget, clock.now());
    let mut spawner = Ticker::from_millis(config.spawn_interval_ms, clock.now());
    let mut histogram = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3)?;
    let mut completed: u64 = 0;

    info!(
        "Running simulation: tick every {}ms, cabbages every {}ms{}",
        config.tick_interval_ms,
        config.spawn_interval_ms,
        if args.unpaced { " (unpaced)" } else { "" }
    );

    'run: while running.load(Ordering::SeqCst) {
        if let Flow::Quit = drain_commands(&commands, &mut world) {
            info!("Quit requested");
            break;
        }

        let now = clock.now();
        for _ in 0..spawner.poll(now) {
            world.spawn_if_active();
        }

        for _ in 0..ticker.poll(now) {
            let started = Instant::now();
            let Some(report) = world.tick() else {
                continue;
            };
            let elapsed = started.elapsed();
            histogram.saturating_record(elapsed.as_micros().max(1) as u64);
            if elapsed > tick_budget {
                warn!("Tick {} exceeded budget: {:?} > {:?}", report.tick, elapsed, tick_budget);
            }

            if let Err(e) = transport.publish(&world) {
                error!("Error sending data: {}", e);
            }

            completed += 1;
            if args.stats_every > 0 && completed % args.stats_every == 0 {
                let stats = world.stats();
                info!(
                    "tick {}: {} goats ({} wandering, {} approaching, {} eating), {} cabbages ({} reserved, mass {:.1})",
                    stats.tick,
                    stats.goats,
                    stats.wandering,
                    stats.approaching,
                    stats.eating,
                    stats.cabbages,
                    stats.reserved_cabbages,
                    stats.cabbage_mass
                );
            }
            if args.ticks.is_some_and(|limit| completed >= limit) {
                debug!("Reached tick limit");
                break 'run;
            }
        }

        let now = clock.now();
        clock.wait(ticker.time_until_due(now).min(spawner.time_until_due(now)));
    }

    if let Err(e) = transport.flush() {
        error!("Error flushing transport: {}", e);
    }
    info!("Stopped after {} ticks, {} frames sent", completed, transport.frames_sent());
    log_summary(&histogram);
    Ok(())
}
