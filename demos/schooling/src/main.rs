//! schooling — aggregation demo for the underwater swarm framework.
//!
//! Drops 20 fish units running the aggregation behavior into a circular
//! tank and watches the swarm contract: units cruise, blink, brake when
//! they hear a crowd, and rest in clusters.  The printed dispersion metric
//! (mean distance to the swarm centroid) should fall over the run.

use std::time::Instant;

use anyhow::Result;

use swarm_behavior::{Actuators, Aggregation, AggregationConfig, Phase};
use swarm_core::{SimConfig, SimRng, Tick, Vec2};
use swarm_sim::{CircularTank, Pose, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 20;
const SEED: u64 = 42;
const TIMESTEP_SECS: f32 = 0.05;
const SIM_MINUTES: u64 = 20;
const SNAPSHOT_INTERVAL_TICKS: u64 = 1_200; // one report per simulated minute

const TANK_RADIUS: f32 = 5.0;
const WALL_SENSING_RANGE: f32 = 0.5;
const COMM_RANGE: f32 = 2.0;
const SPAWN_RADIUS: f32 = 4.0;

// ── Dispersion observer ───────────────────────────────────────────────────────

/// Prints the swarm dispersion at every snapshot and totals broadcasts.
struct DispersionObserver {
    broadcasts: u64,
}

fn dispersion(poses: &[Pose]) -> f32 {
    let n = poses.len() as f32;
    let mut centroid = Vec2::ZERO;
    for pose in poses {
        centroid += pose.position;
    }
    let centroid = centroid.scaled(1.0 / n);
    poses
        .iter()
        .map(|p| p.position.distance(centroid))
        .sum::<f32>()
        / n
}

impl SimObserver for DispersionObserver {
    fn on_tick_end(&mut self, _tick: Tick, broadcasts: usize) {
        self.broadcasts += broadcasts as u64;
    }

    fn on_snapshot(&mut self, tick: Tick, poses: &[Pose], actuators: &[Actuators]) {
        let resting = actuators
            .iter()
            .filter(|a| a.propulsion.left == 0.0 && a.propulsion.right == 0.0)
            .count();
        println!(
            "  t = {:>6.1} s   dispersion = {:.3}   stopped = {:>2}/{}",
            tick.0 as f32 * TIMESTEP_SECS,
            dispersion(poses),
            resting,
            poses.len(),
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== schooling — aggregation in a circular tank ===");
    println!("Agents: {AGENT_COUNT}  |  Minutes: {SIM_MINUTES}  |  Seed: {SEED}");
    println!();

    // 1. Controllers: every unit runs the stock aggregation behavior.
    let controllers: Vec<Aggregation> = (0..AGENT_COUNT)
        .map(|_| Aggregation::new(AggregationConfig::default()))
        .collect::<Result<_, _>>()?;

    // 2. Initial placement: uniform in a disk inside the tank, random headings.
    let mut placement = SimRng::new(SEED);
    let mut positions = Vec::with_capacity(AGENT_COUNT);
    let mut headings = Vec::with_capacity(AGENT_COUNT);
    for _ in 0..AGENT_COUNT {
        let r = SPAWN_RADIUS * placement.gen_range(0.0f32..1.0).sqrt();
        let theta = placement.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        positions.push(Vec2::from_angle(theta).scaled(r));
        headings.push(placement.gen_range(-std::f32::consts::PI..std::f32::consts::PI));
    }

    // 3. Sim config: 20 minutes at the 0.05 s control rate.
    let config = SimConfig {
        timestep_secs: TIMESTEP_SECS,
        total_ticks: SIM_MINUTES * 60 * 20,
        seed: SEED,
        snapshot_interval_ticks: SNAPSHOT_INTERVAL_TICKS,
    };
    println!(
        "Sim: {} ticks ({} min at {} s/tick), report every {} ticks",
        config.total_ticks, SIM_MINUTES, TIMESTEP_SECS, SNAPSHOT_INTERVAL_TICKS
    );
    println!();

    // 4. Build and run.
    let mut sim = SimBuilder::new(
        config,
        CircularTank::new(TANK_RADIUS, WALL_SENSING_RANGE),
        controllers,
    )
    .positions(positions)
    .headings(headings)
    .comm_range(COMM_RANGE)
    .build()?;

    let start_dispersion = dispersion(&sim.poses);
    println!("Initial dispersion: {start_dispersion:.3}");

    let t0 = Instant::now();
    let mut obs = DispersionObserver { broadcasts: 0 };
    sim.run(&mut obs);
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  broadcasts staged : {}", obs.broadcasts);
    println!("  final dispersion  : {:.3}", dispersion(&sim.poses));
    println!();

    // 6. Final per-agent table.
    println!("{:<8} {:<18} {:<10}", "Agent", "Position", "Phase");
    println!("{}", "-".repeat(38));
    for (i, (pose, ctl)) in sim.poses.iter().zip(&sim.controllers).enumerate() {
        let phase = match ctl.fsm.phase {
            Phase::Explore => "explore",
            Phase::Turn => "turn",
            Phase::Brake => "brake",
            Phase::Rest => "rest",
        };
        println!("{:<8} {:<18} {:<10}", i, pose.position.to_string(), phase);
    }

    Ok(())
}
