use std::time::Instant;

use anyhow::{anyhow, ensure, Result};
use clap::Parser;
use intersection_sim::{Car, CarIntention, Direction, Simulation, TrafficSignalPhase, LANE_WIDTH};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

/// The speed vehicles arrive at and cruise at, in m/s.
const ARRIVAL_SPEED: f64 = 10.0; // m/s

#[derive(Parser)]
#[command(name = "intersection-sim")]
#[command(about = "Runs the junction under a fixed-time signal plan with random arrivals")]
struct Cli {
    /// Simulated time to run for in seconds
    #[arg(long, default_value = "120")]
    duration: f64,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.5")]
    delta: f64,

    /// Longest step the simulation is advanced by at once, in seconds
    #[arg(long, default_value = "0.1")]
    max_substep: f64,

    /// Mean arrivals per second on each approach
    #[arg(long, default_value = "0.15")]
    arrival_rate: f64,

    /// Time each signal phase is shown for in seconds
    #[arg(long, default_value = "8")]
    phase_length: f64,

    /// Simulated seconds between summaries
    #[arg(long, default_value = "10")]
    report_every: f64,

    /// Seed for the random arrivals
    #[arg(long, default_value = "0")]
    seed: u64,
}

/// Shows every phase in turn for a fixed time.
struct PhaseCycle {
    length: f64,
    elapsed: f64,
    index: usize,
}

impl PhaseCycle {
    fn new(length: f64) -> Self {
        Self {
            length,
            elapsed: 0.0,
            index: 0,
        }
    }

    fn phase(&self) -> TrafficSignalPhase {
        TrafficSignalPhase::ALL[self.index]
    }

    fn advance(&mut self, dt: f64) -> TrafficSignalPhase {
        self.elapsed += dt;
        while self.elapsed >= self.length {
            self.elapsed -= self.length;
            self.index = (self.index + 1) % TrafficSignalPhase::ALL.len();
        }
        self.phase()
    }
}

/// Poisson arrivals on each approach.
struct Arrivals {
    distr: Exp<f64>,
    rng: StdRng,
    /// The time until the next arrival, by side.
    next: [f64; 4],
}

impl Arrivals {
    fn new(rate: f64, seed: u64) -> Result<Self> {
        let distr = Exp::new(rate).map_err(|err| anyhow!("Invalid arrival rate: {:?}", err))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let next = Direction::ALL.map(|_| distr.sample(&mut rng));
        Ok(Self { distr, rng, next })
    }

    /// Spawns the vehicles due within the next `dt` seconds.
    ///
    /// Arrivals wait off-network while the start of their lane is occupied.
    fn spawn(&mut self, sim: &mut Simulation, dt: f64) -> usize {
        let mut spawned = 0;
        for side in Direction::ALL {
            self.next[side.index()] -= dt;
            if self.next[side.index()] > 0.0 {
                continue;
            }
            let intention = CarIntention::ALL[self.rng.gen_range(0..3)];
            let lane = sim.network().entry_lane(side, intention);
            let blocked = sim
                .vehicles_approaching(side)
                .any(|vehicle| vehicle.lane() == Some(&lane) && vehicle.distance() < LANE_WIDTH);
            if blocked {
                continue;
            }
            sim.spawn_car(Car::new(ARRIVAL_SPEED, ARRIVAL_SPEED, intention), side);
            self.next[side.index()] = self.distr.sample(&mut self.rng);
            spawned += 1;
        }
        spawned
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    ensure!(cli.duration > 0.0, "Duration must be positive");
    ensure!(cli.delta > 0.0, "Time delta must be positive");
    ensure!(cli.max_substep > 0.0, "Maximum sub-step must be positive");
    ensure!(cli.phase_length > 0.0, "Phase length must be positive");

    let substeps = (cli.delta / cli.max_substep).ceil() as usize;
    let dt = cli.delta / substeps as f64;
    info!(
        "Running for {}s in ticks of {}s ({} sub-steps of {:.3}s)",
        cli.duration, cli.delta, substeps, dt
    );

    let mut sim = Simulation::new();
    let mut cycle = PhaseCycle::new(cli.phase_length);
    let mut arrivals = Arrivals::new(cli.arrival_rate, cli.seed)?;
    let mut spawned = 0;
    let mut time = 0.0;
    let mut next_report = cli.report_every;
    let start = Instant::now();

    while time < cli.duration {
        sim.set_phase(cycle.advance(cli.delta));
        spawned += arrivals.spawn(&mut sim, cli.delta);
        for _ in 0..substeps {
            sim.step(dt);
        }
        time += cli.delta;
        debug!("{:.1}s: phase {:?}", time, sim.phase());

        if time >= next_report {
            next_report += cli.report_every;
            report(&sim, time, spawned);
        }
    }

    report(&sim, time, spawned);
    let elapsed = start.elapsed();
    info!(
        "Simulated {} frames in {:?} ({:.0}x real time)",
        sim.frame(),
        elapsed,
        time / elapsed.as_secs_f64()
    );
    Ok(())
}

fn report(sim: &Simulation, time: f64, spawned: usize) {
    let live = sim.iter_vehicles().count();
    let queues = Direction::ALL.map(|side| sim.queue_length(side, 0.5));
    info!(
        "{:.1}s: {:?}, {} live, {} exited, emissions {:.1}, queues N{} E{} S{} W{}",
        time,
        sim.phase(),
        live,
        spawned - live,
        sim.emissions(),
        queues[0],
        queues[1],
        queues[2],
        queues[3]
    );
}
