//! Cellular-automaton cave generation.
//!
//! A grid is seeded at random, then repeatedly smoothed by a Moore-neighborhood
//! rule until walls settle into cave-like shapes. Renderers consume the final
//! [`CaveGrid`] and may query [`CaveGrid::count_neighbors`] for shading.

pub mod automaton;
pub mod cell;
pub mod config;
pub mod grid;

pub use automaton::{
    CaveAutomaton, generate, generate_seeded, generate_with, initialize, initialize_with,
    next_state, step, unit_interval,
};
pub use cell::Cell;
pub use config::{ConfigError, ConfigFileError, GenerationConfig};
pub use grid::{CaveGrid, GridParseError};
