//! Determinism tests.
//!
//! With a fixed layout, fixed seed, and fixed input sequence, two
//! independent simulations must produce identical waypoint sequences,
//! state transitions, and trajectories.

use varuna_nav::{
    BehaviorState, HeatCategory, SearchPattern, SimConfig, Simulation, VehicleMode,
};

fn build_sim(seed: u64, pattern: SearchPattern) -> Simulation {
    let mut config = SimConfig::default();
    config.seed = seed;
    let mut sim = Simulation::new(config).unwrap();
    sim.add_obstacle(0.0, 0.0, 3.0).unwrap();
    sim.add_obstacle(-8.0, 10.0, 2.0).unwrap();
    sim.place_target(-12.0, -10.0, HeatCategory::Survivor).unwrap();
    sim.place_target(14.0, 8.0, HeatCategory::Injured).unwrap();
    sim.set_pattern(pattern);
    sim.set_vehicle_position(-15.0, -15.0);
    sim
}

/// Record of one run: per-tick behavior state and pose, plus waypoints.
struct Trace {
    states: Vec<BehaviorState>,
    positions: Vec<(u32, u32)>,
    found: u32,
}

fn run(seed: u64, pattern: SearchPattern, ticks: usize) -> Trace {
    let mut sim = build_sim(seed, pattern);
    let mut states = Vec::with_capacity(ticks);
    let mut positions = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        sim.tick(16);
        states.push(sim.behavior_state());
        let pose = sim.vehicle().pose;
        positions.push((pose.x.to_bits(), pose.z.to_bits()));
    }
    Trace {
        states,
        positions,
        found: sim.targets_found(),
    }
}

#[test]
fn test_identical_runs_grid_sweep() {
    let a = run(42, SearchPattern::GridSweep, 2000);
    let b = run(42, SearchPattern::GridSweep, 2000);
    assert_eq!(a.states, b.states);
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.found, b.found);
}

#[test]
fn test_identical_runs_random_patrol() {
    // Random patrol leans on the seeded RNG; two runs must still match
    // bit-for-bit.
    let a = run(7, SearchPattern::RandomPatrol, 2000);
    let b = run(7, SearchPattern::RandomPatrol, 2000);
    assert_eq!(a.states, b.states);
    assert_eq!(a.positions, b.positions);
}

#[test]
fn test_different_seeds_diverge_on_random_patrol() {
    let a = run(7, SearchPattern::RandomPatrol, 2000);
    let b = run(8, SearchPattern::RandomPatrol, 2000);
    assert_ne!(a.positions, b.positions);
}

#[test]
fn test_identical_waypoint_sequences() {
    let mut a = build_sim(42, SearchPattern::GridSweep);
    let mut b = build_sim(42, SearchPattern::GridSweep);
    a.tick(16);
    b.tick(16);

    let wa: Vec<_> = a.world().obstacles().iter().map(|o| o.id).collect();
    let wb: Vec<_> = b.world().obstacles().iter().map(|o| o.id).collect();
    assert_eq!(wa, wb);

    // The planner sequences are identical waypoint for waypoint.
    let mut ticks = 0;
    loop {
        let wpa = a.current_waypoint();
        let wpb = b.current_waypoint();
        match (wpa, wpb) {
            (None, None) => break,
            (Some(x), Some(y)) => {
                assert_eq!(x.position.x.to_bits(), y.position.x.to_bits());
                assert_eq!(x.position.z.to_bits(), y.position.z.to_bits());
            }
            _ => panic!("plans diverged"),
        }
        a.tick(16);
        b.tick(16);
        ticks += 1;
        if ticks > 30_000 {
            break;
        }
    }
}

#[test]
fn test_fixed_input_sequence_replays_identically() {
    let script = |sim: &mut Simulation| {
        for tick in 0..1500u64 {
            match tick {
                200 => sim.set_mode(VehicleMode::RescuePriority),
                600 => sim.set_pattern(SearchPattern::SpiralSearch),
                900 => sim.set_mode(VehicleMode::Manual),
                950 => sim.controls_mut().forward = true,
                1100 => {
                    sim.controls_mut().clear();
                    sim.set_mode(VehicleMode::Autonomous);
                }
                _ => {}
            }
            sim.tick(16);
        }
    };

    let mut a = build_sim(42, SearchPattern::GridSweep);
    let mut b = build_sim(42, SearchPattern::GridSweep);
    script(&mut a);
    script(&mut b);

    let pa = a.vehicle().pose;
    let pb = b.vehicle().pose;
    assert_eq!(pa.x.to_bits(), pb.x.to_bits());
    assert_eq!(pa.z.to_bits(), pb.z.to_bits());
    assert_eq!(pa.heading.to_bits(), pb.heading.to_bits());
    assert_eq!(a.targets_found(), b.targets_found());
    assert_eq!(a.behavior_state(), b.behavior_state());
}
