use std::path::PathBuf;

use anyhow::{Context, Result};
use cave_core::{GenerationConfig, generate_seeded};
use clap::Parser;
use log::info;

mod output;
mod seed;

use output::{CaveReport, OutputFormat};
use seed::RunSeed;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a cellular-automaton cave", long_about = None)]
struct Args {
    /// TOML file with generation parameters; the flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width and height for a square cave
    #[arg(long, conflicts_with_all = ["width", "height"])]
    size: Option<usize>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Percentage of cells that start as walls (0-100)
    #[arg(short, long)]
    density: Option<f64>,

    /// Wall neighbors needed to grow a wall; existing walls need one fewer
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<i32>,

    /// Number of automaton steps
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Random seed; a fresh one is generated and reported when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
}

fn resolve_config(args: &Args) -> Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GenerationConfig::default(),
    };

    if let Some(size) = args.size {
        config.width = size;
        config.height = size;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(density) = args.density {
        config.wall_density = density;
    }
    if let Some(threshold) = args.threshold {
        config.neighbor_threshold = threshold;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }

    config.validate().context("Invalid generation parameters")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let seed = RunSeed::from_flag(args.seed);
    info!("generating with seed {} ({:?})", seed.value, seed.origin);

    let cave = generate_seeded(&config, seed.value).context("Cave generation failed")?;
    let report = CaveReport::new(&config, seed.value, &cave);
    println!("{}", output::render(&report, args.format)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn parse(parts: &[&str]) -> Args {
        Args::try_parse_from(parts).expect("arguments should parse")
    }

    #[test]
    fn defaults_apply_without_flags() {
        let config = resolve_config(&parse(&["cave"])).expect("defaults are valid");
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "cave", "--size", "30", "-d", "52.5", "-t", "-1", "-i", "9", "--seed", "11",
        ]);
        let config = resolve_config(&args).expect("flags are valid");
        assert_eq!(config, GenerationConfig::new(30, 30, 52.5, -1, 9));
        assert_eq!(args.seed, Some(11));
    }

    #[test]
    fn size_conflicts_with_explicit_dimensions() {
        assert!(Args::try_parse_from(["cave", "--size", "10", "--width", "12"]).is_err());
    }

    #[test]
    fn negative_iterations_are_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["cave", "--iterations", "-3"]).is_err());
    }

    #[test]
    fn invalid_density_is_reported() {
        let err = resolve_config(&parse(&["cave", "--density", "120"]))
            .expect_err("density above 100 should fail");
        assert!(format!("{err:#}").contains("wall density"), "{err:#}");
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("cave.toml");
        fs::write(&path, "width = 70\nheight = 20\niterations = 2\n").expect("write config");

        let path_arg = path.to_string_lossy().into_owned();
        let args = parse(&["cave", "--config", &path_arg, "--height", "25"]);
        let config = resolve_config(&args).expect("config should resolve");

        assert_eq!((config.width, config.height, config.iterations), (70, 25, 2));
    }
}
