use std::time::Duration;

use clap::Parser;
use maze::MazeSettings;
use rand::{rngs::StdRng, SeedableRng};

/// Generate random mazes and walk the shortest path from start to goal
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Settings {
    /// Maze height, border included
    #[arg(long, default_value_t = MazeSettings::default().rows)]
    pub rows: usize,

    /// Maze width, border included
    #[arg(long, default_value_t = MazeSettings::default().columns)]
    pub cols: usize,

    /// Chance for each interior cell to be a wall
    #[arg(long, default_value_t = MazeSettings::default().wall_probability)]
    pub wall_probability: f64,

    /// Random seed, taken from the OS when missing
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between two revealed path cells, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,

    /// Generate and solve a single maze, then exit
    #[arg(long)]
    pub once: bool,

    /// Print the single maze and its solution as JSON
    #[arg(long, requires = "once")]
    pub json: bool,
}

impl Settings {
    pub fn maze_settings(&self) -> MazeSettings {
        MazeSettings {
            rows: self.rows,
            columns: self.cols,
            wall_probability: self.wall_probability,
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
