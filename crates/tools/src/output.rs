//! Text and JSON renderings of a generated cave for the command line.

use anyhow::{Context, Result};
use cave_core::{CaveGrid, GenerationConfig};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `#` for walls, `.` for open cells, followed by a summary line
    Ascii,
    /// Parameters, statistics and rows as a JSON object
    Json,
}

#[derive(Debug, Serialize)]
pub struct CaveReport {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub wall_density: f64,
    pub neighbor_threshold: i32,
    pub iterations: u32,
    pub walls: usize,
    pub fingerprint: String,
    pub rows: Vec<String>,
}

impl CaveReport {
    pub fn new(config: &GenerationConfig, seed: u64, cave: &CaveGrid) -> Self {
        Self {
            width: cave.width(),
            height: cave.height(),
            seed,
            wall_density: config.wall_density,
            neighbor_threshold: config.neighbor_threshold,
            iterations: config.iterations,
            walls: cave.wall_count(),
            fingerprint: format!("{:016x}", cave.fingerprint()),
            rows: cave.rows().map(|row| row.iter().map(|cell| cell.glyph()).collect()).collect(),
        }
    }

    fn summary(&self) -> String {
        let cells = self.width * self.height;
        let percent = self.walls as f64 * 100.0 / cells as f64;
        format!(
            "{}x{} seed={} walls={}/{} ({percent:.1}%) fingerprint={}",
            self.width, self.height, self.seed, self.walls, cells, self.fingerprint
        )
    }
}

pub fn render(report: &CaveReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Ascii => {
            let mut text = report.rows.join("\n");
            text.push('\n');
            text.push_str(&report.summary());
            Ok(text)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize cave report")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CaveReport {
        let cave = CaveGrid::from_rows(&["##.", "#.."]).expect("valid rows");
        let config = GenerationConfig::new(3, 2, 45.0, 5, 0);
        CaveReport::new(&config, 7, &cave)
    }

    #[test]
    fn ascii_lists_rows_then_summary() {
        let text = render(&sample_report(), OutputFormat::Ascii).expect("ascii render");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "##.");
        assert_eq!(lines[1], "#..");
        assert!(lines[2].starts_with("3x2 seed=7 walls=3/6 (50.0%)"), "{}", lines[2]);
    }

    #[test]
    fn json_carries_rows_and_parameters() {
        let text = render(&sample_report(), OutputFormat::Json).expect("json render");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["rows"][1], "#..");
        assert_eq!(value["seed"], 7);
        assert_eq!(value["walls"], 3);
        assert_eq!(value["fingerprint"].as_str().map(str::len), Some(16));
    }
}
