//! Scanner benchmarks
//!
//! The ray fan is the per-frame hot loop: every tick marches
//! ray_count × (max_range / step) sample points against the obstacle set.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use varuna_nav::{
    ArenaBounds, FogMap, Pose, ScannerConfig, SensorScanner, VehicleMode, WorldModel,
};

fn build_world(obstacles: usize) -> (WorldModel, FogMap) {
    let arena = ArenaBounds::new(20.0, 1.0);
    let fog = FogMap::new(&arena, 1.0);
    let mut world = WorldModel::new(arena, 42);
    for i in 0..obstacles {
        let angle = i as f32 * 0.7;
        let radius = 6.0 + (i % 3) as f32 * 4.0;
        world
            .add_obstacle(
                varuna_nav::Point2D::new(radius * angle.cos(), radius * angle.sin()),
                1.5,
            )
            .unwrap();
    }
    for _ in 0..4 {
        let _ = world.spawn_target(varuna_nav::HeatCategory::Survivor);
    }
    (world, fog)
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for obstacles in [0usize, 4, 12] {
        group.bench_with_input(
            BenchmarkId::new("ray_fan", obstacles),
            &obstacles,
            |b, &obstacles| {
                let (mut world, mut fog) = build_world(obstacles);
                let mut scanner = SensorScanner::new(ScannerConfig::default());
                let pose = Pose::new(0.0, 0.0, 0.0);
                let mut now = 0u64;
                b.iter(|| {
                    // Step past the rate limiter so every iteration is a
                    // fresh scan.
                    now += 50;
                    let scan =
                        scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, now);
                    black_box(scan.clear.len())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
