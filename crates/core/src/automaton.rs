//! Stochastic initialization, the wall/open transition rule, and the driver
//! that iterates it.
//!
//! Each step reads only the previous grid and writes a separate buffer, so the
//! order in which cells are visited never affects the outcome. Walls survive
//! with one neighbor fewer than it takes to grow a new wall; this hysteresis
//! is what thickens the cave walls instead of letting them flicker.

use std::mem;

use log::{debug, trace};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::cell::Cell;
use crate::config::{ConfigError, GenerationConfig};
use crate::grid::CaveGrid;

/// Uniform draw in `[0, 1)` built from the top 53 bits of `next_u64`.
pub fn unit_interval<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
}

/// Seeds a fresh grid from `rng`, one independent draw per cell.
pub fn initialize<R: Rng + ?Sized>(
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<CaveGrid, ConfigError> {
    initialize_with(config, || unit_interval(rng))
}

/// Seeds a fresh grid from an arbitrary source of `[0, 1)` draws.
///
/// Cells are drawn row by row; a cell is a wall when its draw is strictly
/// below `wall_density / 100`.
pub fn initialize_with<F>(config: &GenerationConfig, mut sample: F) -> Result<CaveGrid, ConfigError>
where
    F: FnMut() -> f64,
{
    config.validate()?;
    let probability = config.wall_probability();
    let cells = (0..config.cell_count()).map(|_| Cell::from(sample() < probability)).collect();
    Ok(CaveGrid::from_raw_parts(config.width, config.height, cells))
}

/// Transition rule for a single cell.
///
/// A wall stays a wall with at least `neighbor_threshold - 1` wall neighbors;
/// an open cell becomes a wall with at least `neighbor_threshold`. Thresholds
/// outside `1..=8` are not clamped.
pub fn next_state(cell: Cell, neighbors: u8, neighbor_threshold: i32) -> Cell {
    let effective = if cell.is_wall() {
        neighbor_threshold.saturating_sub(1)
    } else {
        neighbor_threshold
    };
    Cell::from(i32::from(neighbors) >= effective)
}

/// Writes the successor of `current` into `next`.
///
/// Both grids must share dimensions.
pub(crate) fn step_into(current: &CaveGrid, next: &mut CaveGrid, neighbor_threshold: i32) {
    assert_eq!(
        (current.width(), current.height()),
        (next.width(), next.height()),
        "step buffers must have identical dimensions"
    );
    let width = current.width();
    for (index, slot) in next.cells_mut().iter_mut().enumerate() {
        let neighbors = current.count_neighbors(index % width, index / width);
        *slot = next_state(current.cells()[index], neighbors, neighbor_threshold);
    }
}

/// One automaton step as a pure function of `grid`.
pub fn step(grid: &CaveGrid, neighbor_threshold: i32) -> CaveGrid {
    let mut next = grid.clone();
    step_into(grid, &mut next, neighbor_threshold);
    next
}

/// Double-buffered driver: two grids of fixed size swapped after every step.
#[derive(Clone, Debug)]
pub struct CaveAutomaton {
    current: CaveGrid,
    next: CaveGrid,
    neighbor_threshold: i32,
    generation: u32,
}

impl CaveAutomaton {
    pub fn new(initial: CaveGrid, neighbor_threshold: i32) -> Self {
        let next = initial.clone();
        Self { current: initial, next, neighbor_threshold, generation: 0 }
    }

    pub fn advance(&mut self) {
        step_into(&self.current, &mut self.next, self.neighbor_threshold);
        mem::swap(&mut self.current, &mut self.next);
        self.generation = self.generation.saturating_add(1);
        trace!("cave step {}: walls={}", self.generation, self.current.wall_count());
    }

    pub fn run(&mut self, steps: u32) {
        for _ in 0..steps {
            self.advance();
        }
    }

    /// Number of steps applied since construction.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn neighbor_threshold(&self) -> i32 {
        self.neighbor_threshold
    }

    pub fn grid(&self) -> &CaveGrid {
        &self.current
    }

    pub fn into_grid(self) -> CaveGrid {
        self.current
    }
}

/// Validates `config`, seeds a grid from `rng` and applies
/// `config.iterations` steps.
pub fn generate<R: Rng + ?Sized>(
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<CaveGrid, ConfigError> {
    let initial = initialize(config, rng)?;
    Ok(iterate(config, initial))
}

pub fn generate_with<F>(config: &GenerationConfig, sample: F) -> Result<CaveGrid, ConfigError>
where
    F: FnMut() -> f64,
{
    let initial = initialize_with(config, sample)?;
    Ok(iterate(config, initial))
}

/// Generates with a `ChaCha8Rng` seeded from `seed`; equal seeds and configs
/// give identical caves.
pub fn generate_seeded(config: &GenerationConfig, seed: u64) -> Result<CaveGrid, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(config, &mut rng)
}

fn iterate(config: &GenerationConfig, initial: CaveGrid) -> CaveGrid {
    debug!(
        "generating cave {}x{} density={} threshold={} iterations={}",
        config.width,
        config.height,
        config.wall_density,
        config.neighbor_threshold,
        config.iterations
    );
    let mut automaton = CaveAutomaton::new(initial, config.neighbor_threshold);
    automaton.run(config.iterations);
    let grid = automaton.into_grid();
    debug!("generated cave: walls={} fingerprint={:#018x}", grid.wall_count(), grid.fingerprint());
    grid
}
