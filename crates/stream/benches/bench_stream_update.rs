use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use liminal_scene::SceneRegistry;
use liminal_stream::{StreamConfig, Streamer};

fn bench_stationary(iterations: usize) {
    let streamer = Streamer::new(StreamConfig::default());
    let mut rng = rand::rng();
    let mut registry = SceneRegistry::new(&mut rng);

    // First tick pays the bulk generation cost; exclude it.
    streamer.update(registry.active_mut(), Vec3::ZERO, &mut rng);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(streamer.update(registry.active_mut(), black_box(Vec3::ZERO), &mut rng));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  stationary ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_walk(scene_index: usize, step: f32, iterations: usize) {
    let streamer = Streamer::new(StreamConfig::default());
    let mut rng = rand::rng();
    let mut registry = SceneRegistry::new(&mut rng);
    registry.switch_to(scene_index).ok();

    let start = Instant::now();
    for i in 0..iterations {
        let viewpoint = Vec3::new(0.0, 1.6, -(i as f32) * step);
        let _ = black_box(streamer.update(registry.active_mut(), black_box(viewpoint), &mut rng));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  walk scene {scene_index} (step {step}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_teleport(iterations: usize) {
    let streamer = Streamer::new(StreamConfig::default());
    let mut rng = rand::rng();
    let mut registry = SceneRegistry::new(&mut rng);

    let start = Instant::now();
    for i in 0..iterations {
        // Alternate between two far-apart neighborhoods to force full
        // generate + evict churn every tick.
        let x = if i % 2 == 0 { 0.0 } else { 400.0 };
        let viewpoint = Vec3::new(x, 1.6, 0.0);
        let _ = black_box(streamer.update(registry.active_mut(), black_box(viewpoint), &mut rng));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  teleport ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Stream Update Benchmarks ===\n");

    println!("Stationary viewpoint (corner churn only):");
    bench_stationary(1000);

    println!("\nSteady walk (per-scene generator cost):");
    bench_walk(0, 0.5, 1000);
    bench_walk(1, 0.5, 1000);
    bench_walk(2, 0.5, 1000);
    bench_walk(3, 0.5, 1000);

    println!("\nTeleport (worst-case churn):");
    bench_teleport(200);

    println!("\n=== Done ===");
}
