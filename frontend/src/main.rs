use std::io::{self, Write};

use clap::Parser;
use log::debug;

mod app;
mod config;
mod event;
mod reveal;

use app::{render, write_outcome, App, Report};
use config::Settings;

/// Generate one maze, solve it and print the result
fn run_once<W: Write>(settings: &Settings, out: &mut W) -> anyhow::Result<()> {
    let grid = settings.maze_settings().generate(&mut settings.rng())?;
    let outcome = grid.solve();

    if settings.json {
        serde_json::to_writer_pretty(&mut *out, &Report {
            grid: &grid,
            outcome: &outcome,
        })?;
        writeln!(out)?;
    } else {
        let path = outcome
            .path_result()
            .map(|r| r.path.as_slice())
            .unwrap_or_default();
        write!(out, "{}", render(&grid, path))?;
        write_outcome(&outcome, out)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::parse();
    debug!("{:?}", settings);

    let mut out = io::stdout().lock();

    if settings.once {
        return run_once(&settings, &mut out);
    }

    let mut app = App::new(
        settings.maze_settings(),
        settings.reveal_delay(),
        settings.rng(),
    )?;
    app.run(io::stdin().lock(), &mut out)
}
