use std::{
    io::{BufRead, Write},
    ops::ControlFlow,
    time::Duration,
};

use log::{debug, error};
use maze::{Cell, Grid, MazeSettings, PathResult, Point, SearchOutcome};
use rand::Rng;
use serde::Serialize;

use crate::{event::Command, reveal};

const PATH_MARK: char = '*';

/// Everything a single solve produced, as printed by `--json`
#[derive(Serialize)]
pub struct Report<'a> {
    pub grid: &'a Grid,
    pub outcome: &'a SearchOutcome<Point>,
}

/// Draw the grid as text with the given path cells marked.
/// The start and goal keep their own markers.
pub fn render(grid: &Grid, path: &[Point]) -> String {
    let mut lines: Vec<Vec<char>> = grid
        .to_string()
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    for point in path {
        if grid.get(*point) == Some(Cell::Free) {
            lines[point.row][point.col] = PATH_MARK;
        }
    }

    lines
        .into_iter()
        .map(|line| line.into_iter().chain(['\n']).collect::<String>())
        .collect()
}

/// Write the outcome of a solve as the final message shown to the user
pub fn write_outcome<W: Write>(outcome: &SearchOutcome<Point>, out: &mut W) -> anyhow::Result<()> {
    match outcome {
        SearchOutcome::PathFound(PathResult { total_cost, .. }) => {
            writeln!(out, "Path Cost = {}", total_cost)?
        }
        SearchOutcome::NoPathFound => writeln!(out, "No Path Found")?,
    }
    Ok(())
}

/// Terminal session around one maze at a time
pub struct App<R> {
    settings: MazeSettings,
    delay: Duration,
    rng: R,
    grid: Grid,
    /// Path cells currently drawn on top of the maze
    revealed: Vec<Point>,
}

impl<R: Rng> App<R> {
    pub fn new(settings: MazeSettings, delay: Duration, mut rng: R) -> anyhow::Result<Self> {
        let grid = settings.generate(&mut rng)?;
        Ok(Self {
            settings,
            delay,
            rng,
            grid,
            revealed: Vec::new(),
        })
    }

    pub fn draw<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        write!(out, "{}", render(&self.grid, &self.revealed))?;
        Ok(())
    }

    pub fn handle_event<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> anyhow::Result<ControlFlow<()>> {
        debug!("handling command: {:?}", command);

        match command {
            Command::Solve => self.solve(out)?,
            Command::Reset => {
                self.revealed.clear();
                self.draw(out)?;
            }
            Command::NewMaze => {
                // keep the current maze if a new one cannot be placed
                self.grid = self.settings.generate(&mut self.rng)?;
                self.revealed.clear();
                self.draw(out)?;
            }
            Command::Help => {
                for command in Command::iterate() {
                    writeln!(out, "  {:<6} {}", command, command.description())?;
                }
            }
            Command::Quit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn solve<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let outcome = self.grid.solve();

        if let SearchOutcome::PathFound(result) = &outcome {
            for shown in reveal::paced(reveal::prefixes(&result.path), self.delay) {
                self.revealed = shown.to_vec();
                self.draw(out)?;
                writeln!(out)?;
                out.flush()?;
            }
        }

        write_outcome(&outcome, out)
    }

    /// Read commands line by line until `quit` or the end of input.
    /// Unknown commands (including lines that are not valid UTF-8) and failed
    /// commands are reported and the session goes on; only I/O errors end it.
    pub fn run<B: BufRead, W: Write>(&mut self, mut input: B, out: &mut W) -> anyhow::Result<()> {
        self.draw(out)?;
        prompt(out)?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if !line.trim().is_empty() {
                match line.parse::<Command>() {
                    Ok(command) => match self.handle_event(command, out) {
                        Ok(ControlFlow::Break(())) => break,
                        Ok(ControlFlow::Continue(())) => {}
                        Err(e) => {
                            error!("{} failed: {:#}", command, e);
                            writeln!(out, "error: {:#}", e)?;
                        }
                    },
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            prompt(out)?;
        }

        Ok(())
    }
}

fn prompt<W: Write>(out: &mut W) -> anyhow::Result<()> {
    write!(out, "[s]olve [r]eset [n]ew [h]elp [q]uit > ")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn app(settings: MazeSettings) -> App<StdRng> {
        App::new(settings, Duration::ZERO, StdRng::seed_from_u64(17)).unwrap()
    }

    fn open_settings() -> MazeSettings {
        MazeSettings {
            rows: 5,
            columns: 6,
            wall_probability: 0.0,
        }
    }

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_render_marks_path() {
        let grid: Grid = "
            #####
            #S..#
            #..G#
            #####
        "
        .parse()
        .unwrap();
        let path = [
            Point::new(1, 1),
            Point::new(1, 2),
            Point::new(1, 3),
            Point::new(2, 3),
        ];

        assert_eq!(render(&grid, &path), "#####\n#S**#\n#..G#\n#####\n");
        assert_eq!(render(&grid, &[]), grid.to_string());
    }

    #[test]
    fn test_solve_open_maze() {
        let mut app = app(open_settings());
        let mut out = Vec::new();

        let flow = app.handle_event(Command::Solve, &mut out).unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));

        let cost = app.grid.solve().total_cost().unwrap();
        let text = output(out);
        assert!(text.ends_with(&format!("Path Cost = {}\n", cost)));
        // one drawing per revealed cell
        assert_eq!(text.matches('S').count(), cost + 1);
        assert_eq!(app.revealed.len(), cost + 1);
    }

    #[test]
    fn test_solve_without_path() {
        let mut app = app(open_settings());
        app.grid = "
            #######
            #S.#.G#
            #######
        "
        .parse()
        .unwrap();

        let mut out = Vec::new();
        app.handle_event(Command::Solve, &mut out).unwrap();
        assert_eq!(output(out), "No Path Found\n");
        assert!(app.revealed.is_empty());
    }

    #[test]
    fn test_reset_clears_path() {
        let mut app = app(open_settings());
        app.handle_event(Command::Solve, &mut Vec::new()).unwrap();
        assert!(!app.revealed.is_empty());

        let mut out = Vec::new();
        app.handle_event(Command::Reset, &mut out).unwrap();
        assert!(app.revealed.is_empty());
        assert_eq!(output(out), app.grid.to_string());
    }

    #[test]
    fn test_new_maze_replaces_grid() {
        let mut app = app(MazeSettings::default());
        app.handle_event(Command::Solve, &mut Vec::new()).unwrap();

        app.handle_event(Command::NewMaze, &mut Vec::new()).unwrap();
        assert!(app.revealed.is_empty());
        assert_eq!(app.grid.rows(), 7);
        assert_eq!(app.grid.columns(), 9);
        assert_eq!(app.grid.count(Cell::Start), 1);
        assert_eq!(app.grid.count(Cell::Goal), 1);
    }

    #[test]
    fn test_new_maze_failure_keeps_grid() {
        let mut app = app(open_settings());
        let before = app.grid.clone();

        app.settings.wall_probability = 1.0;
        assert!(app.handle_event(Command::NewMaze, &mut Vec::new()).is_err());
        assert_eq!(app.grid, before);
    }

    #[test]
    fn test_quit_breaks() {
        let mut app = app(open_settings());
        assert_eq!(
            app.handle_event(Command::Quit, &mut Vec::new()).unwrap(),
            ControlFlow::Break(())
        );
    }

    #[test]
    fn test_run_session() {
        let mut app = app(open_settings());
        let input = "help\nfly\n\ns\nq\nn\n".as_bytes();
        let mut out = Vec::new();

        app.run(input, &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("generate a new random maze"));
        assert!(text.contains("Unknown command"));
        assert!(text.contains("Path Cost = "));
        // nothing after quit is handled
        assert_eq!(text.matches("[s]olve").count(), 5);
    }

    #[test]
    fn test_run_survives_invalid_utf8() {
        let mut app = app(open_settings());
        let input: &[u8] = b"\xff\xfe\nsolve\nq\n";
        let mut out = Vec::new();

        app.run(input, &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("Unknown command"));
        assert!(text.contains("Path Cost = "));
    }

    #[test]
    fn test_report_json() {
        let grid = Grid::walled(3, 3);
        let outcome = SearchOutcome::NoPathFound;
        let json = serde_json::to_value(Report {
            grid: &grid,
            outcome: &outcome,
        })
        .unwrap();

        assert_eq!(json["outcome"], "NoPathFound");
        assert_eq!(json["grid"]["rows"], 3);
        assert_eq!(json["grid"]["cells"][1][1], "Free");
    }
}
