use anyhow::{Result, ensure};
use cave_core::{CaveGrid, GenerationConfig, generate_seeded, next_state, step};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn between(rng: &mut ChaCha8Rng, min: u64, max: u64) -> u64 {
    min + rng.next_u64() % (max - min + 1)
}

fn random_config(rng: &mut ChaCha8Rng) -> GenerationConfig {
    let random_density = between(rng, 0, 10_000) as f64 / 100.0;
    // Bias towards the bounds so the fixpoint checks below actually run.
    let wall_density = choose(rng, &[0.0, 100.0, random_density, random_density]);
    GenerationConfig::new(
        between(rng, 1, 64) as usize,
        between(rng, 1, 64) as usize,
        wall_density,
        between(rng, 0, 12) as i32 - 2,
        between(rng, 0, 8) as u32,
    )
}

/// Walls in the clamped 3x3 window around `(x, y)`, minus the cell itself.
fn window_wall_count(cave: &CaveGrid, x: usize, y: usize) -> u8 {
    let xs = x.saturating_sub(1)..=(x + 1).min(cave.width() - 1);
    let ys = y.saturating_sub(1)..=(y + 1).min(cave.height() - 1);
    let window = ys
        .flat_map(|wy| xs.clone().map(move |wx| (wx, wy)))
        .filter(|&(wx, wy)| cave.is_wall(wx, wy))
        .count();
    (window - usize::from(cave.is_wall(x, y))) as u8
}

fn check_invariants(config: &GenerationConfig, cave_seed: u64) -> Result<()> {
    let cave = generate_seeded(config, cave_seed)?;
    ensure!(
        cave.width() == config.width && cave.height() == config.height,
        "Invariant failed: generated {}x{} for {config:?}",
        cave.width(),
        cave.height()
    );

    let again = generate_seeded(config, cave_seed)?;
    ensure!(cave == again, "Invariant failed: seed {cave_seed} is not reproducible");

    let next = step(&cave, config.neighbor_threshold);
    ensure!(next.len() == cave.len(), "Invariant failed: step changed the grid size");

    for y in 0..cave.height() {
        for x in 0..cave.width() {
            let count = cave.count_neighbors(x, y);
            let expected = window_wall_count(&cave, x, y);
            ensure!(
                count == expected,
                "Invariant failed: {count} neighbors at ({x}, {y}), window has {expected}"
            );

            let cell = cave.get(x, y).unwrap_or_default();
            let successor = next_state(cell, expected, config.neighbor_threshold);
            ensure!(
                next.get(x, y) == Some(successor),
                "Invariant failed: step disagrees with the rule at ({x}, {y}) for {config:?}"
            );
        }
    }

    if config.wall_density >= 100.0 && config.neighbor_threshold <= 1 {
        ensure!(cave.open_count() == 0, "Invariant failed: solid cave opened for {config:?}");
    }
    if config.wall_density <= 0.0 && config.neighbor_threshold > 8 {
        ensure!(cave.wall_count() == 0, "Invariant failed: empty cave grew walls for {config:?}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for run in 0..args.runs {
        let config = random_config(&mut rng);
        let cave_seed = rng.next_u64();
        log::debug!("run {run}: seed={cave_seed} {config:?}");
        check_invariants(&config, cave_seed)?;
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
