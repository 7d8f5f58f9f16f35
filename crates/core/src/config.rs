//! Generation parameters, their validation, and TOML loading.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

pub const DEFAULT_SIZE: usize = 50;
pub const DEFAULT_WALL_DENSITY: f64 = 45.0;
pub const DEFAULT_NEIGHBOR_THRESHOLD: i32 = 5;
pub const DEFAULT_ITERATIONS: u32 = 4;

/// Immutable parameters for one generation run.
///
/// Every field has a default, so a TOML file only needs to name the values it
/// changes. `neighbor_threshold` is deliberately unrestricted: values at or
/// below zero or above eight produce degenerate but well-defined caves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    /// Percentage in `[0, 100]`.
    pub wall_density: f64,
    pub neighbor_threshold: i32,
    pub iterations: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            wall_density: DEFAULT_WALL_DENSITY,
            neighbor_threshold: DEFAULT_NEIGHBOR_THRESHOLD,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl GenerationConfig {
    pub fn new(
        width: usize,
        height: usize,
        wall_density: f64,
        neighbor_threshold: i32,
        iterations: u32,
    ) -> Self {
        Self { width, height, wall_density, neighbor_threshold, iterations }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.width, self.height)?;
        if !(0.0..=100.0).contains(&self.wall_density) {
            return Err(ConfigError::WallDensityOutOfRange { value: self.wall_density });
        }
        Ok(())
    }

    /// Probability in `[0, 1]` that an initialized cell is a wall.
    pub fn wall_probability(&self) -> f64 {
        self.wall_density / 100.0
    }

    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigFileError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigFileError::Parse { message: e.to_string() })?;
        config.validate().map_err(ConfigFileError::Invalid)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let source = fs::read_to_string(path).map_err(ConfigFileError::Io)?;
        Self::from_toml_str(&source)
    }
}

/// Largest cell count a single `Vec<Cell>` can hold.
pub(crate) const MAX_CELLS: usize = isize::MAX as usize / size_of::<Cell>();

/// Checks that a `width × height` grid is non-empty and allocatable, returning
/// its cell count.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<usize, ConfigError> {
    if width == 0 {
        return Err(ConfigError::ZeroWidth);
    }
    if height == 0 {
        return Err(ConfigError::ZeroHeight);
    }
    width
        .checked_mul(height)
        .filter(|&len| len <= MAX_CELLS)
        .ok_or(ConfigError::GridTooLarge { width, height })
}

/// Describes why a set of generation parameters was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ZeroWidth,
    ZeroHeight,
    /// `width * height` cells exceed what one allocation can hold.
    GridTooLarge { width: usize, height: usize },
    /// Density outside `[0, 100]`, including NaN.
    WallDensityOutOfRange { value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWidth => write!(f, "grid width must be positive"),
            Self::ZeroHeight => write!(f, "grid height must be positive"),
            Self::GridTooLarge { width, height } => {
                write!(f, "grid of {width}x{height} cells is too large")
            }
            Self::WallDensityOutOfRange { value } => {
                write!(f, "wall density {value} is outside the range 0..=100")
            }
        }
    }
}

impl Error for ConfigError {}

/// Describes why a configuration file could not be loaded.
#[derive(Debug)]
pub enum ConfigFileError {
    Io(io::Error),
    Parse { message: String },
    Invalid(ConfigError),
}

impl fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Parse { message } => write!(f, "invalid config file: {message}"),
            Self::Invalid(e) => write!(f, "invalid generation parameters: {e}"),
        }
    }
}

impl Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { .. } => None,
            Self::Invalid(e) => Some(e),
        }
    }
}
