//! Headless search-and-rescue patrol demo
//!
//! Drives the simulation core without a renderer: builds an arena with a
//! few obstacles and heat signatures, then ticks the autonomous vehicle
//! and prints telemetry once per simulated second.
//!
//! Usage:
//!   cargo run --example rescue_patrol
//!   cargo run --example rescue_patrol -- --pattern spiral --rescue
//!
//! Enable logging to watch behavior transitions:
//!   RUST_LOG=info cargo run --example rescue_patrol

use clap::Parser;

use varuna_nav::{HeatCategory, SearchPattern, SimConfig, Simulation, VehicleMode};

/// Headless rescue patrol demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search pattern: grid, perimeter, spiral, or patrol
    #[arg(short, long, default_value = "grid")]
    pattern: String,

    /// Run in rescue-priority mode
    #[arg(long)]
    rescue: bool,

    /// Random seed (0 = entropy)
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Simulated duration in seconds
    #[arg(long, default_value = "60")]
    duration: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let pattern = match args.pattern.as_str() {
        "grid" => SearchPattern::GridSweep,
        "perimeter" => SearchPattern::PerimeterSweep,
        "spiral" => SearchPattern::SpiralSearch,
        "patrol" => SearchPattern::RandomPatrol,
        other => {
            eprintln!("Unknown pattern '{}', using grid", other);
            SearchPattern::GridSweep
        }
    };

    let mut config = SimConfig::default();
    config.seed = args.seed;
    let mut sim = Simulation::new(config).expect("default config is valid");

    // A small debris field and a mixed set of signatures.
    sim.add_obstacle(0.0, 0.0, 3.0).unwrap();
    sim.add_obstacle(-8.0, 10.0, 2.0).unwrap();
    sim.add_obstacle(12.0, -6.0, 2.5).unwrap();
    sim.place_target(-12.0, -10.0, HeatCategory::Survivor).unwrap();
    sim.place_target(14.0, 8.0, HeatCategory::Injured).unwrap();
    sim.place_target(6.0, -14.0, HeatCategory::Animal).unwrap();

    sim.set_pattern(pattern);
    if args.rescue {
        sim.set_mode(VehicleMode::RescuePriority);
    }
    sim.set_vehicle_position(-15.0, -15.0);

    // 60 Hz frames.
    let dt_ms = 16;
    let ticks_per_second = 1000 / dt_ms;
    for second in 0..args.duration {
        for _ in 0..ticks_per_second {
            sim.tick(dt_ms);
        }
        let t = sim.telemetry();
        println!(
            "[{:>3}s] {:<18} pos=({:>6.1},{:>6.1}) found={} searched={:>5.1}% battery={:>5.1}% | {}",
            second + 1,
            t.behavior.as_str(),
            t.pose.x,
            t.pose.z,
            t.targets_found,
            t.searched_percent,
            t.battery_percent,
            t.status
        );
    }

    let t = sim.telemetry();
    println!(
        "\nPatrol finished: {} targets collected, {:.1}% of the arena searched",
        t.targets_found, t.searched_percent
    );
}
