use std::fmt::Display;

use log::debug;
use rand::Rng;

use crate::grid::{Cell, Grid, Point};

/// Smallest number of rows or columns that leaves room inside the border wall
pub const MIN_SIDE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// Rows or columns below [`MIN_SIDE`]
    InvalidDimensions { rows: usize, columns: usize },
    /// The wall probability is not within `[0, 1]`
    InvalidWallProbability(f64),
    /// Fewer than two interior cells were left free, so a distinct start and
    /// goal cannot be placed
    NotEnoughFreeCells { free: usize },
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::InvalidDimensions { rows, columns } => write!(
                f,
                "invalid maze size {}x{}: both sides must be at least {}",
                rows, columns, MIN_SIDE
            ),
            GenerateError::InvalidWallProbability(p) => {
                write!(f, "wall probability {} is outside [0, 1]", p)
            }
            GenerateError::NotEnoughFreeCells { free } => write!(
                f,
                "only {} free interior cell(s), need two for start and goal",
                free
            ),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Parameters for a random maze
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeSettings {
    pub rows: usize,
    pub columns: usize,
    pub wall_probability: f64,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            rows: 7,
            columns: 9,
            wall_probability: 0.3,
        }
    }
}

impl MazeSettings {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Grid, GenerateError> {
        generate(self.rows, self.columns, self.wall_probability, rng)
    }
}

/// Generate a random maze.
///
/// The border is always wall. Every interior cell independently becomes a
/// wall with `wall_probability`, then a start and a goal are placed on
/// uniformly drawn free interior cells. Nothing guarantees that the goal can
/// be reached from the start.
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    wall_probability: f64,
    rng: &mut R,
) -> Result<Grid, GenerateError> {
    if rows < MIN_SIDE || columns < MIN_SIDE {
        return Err(GenerateError::InvalidDimensions { rows, columns });
    }
    if !(0.0..=1.0).contains(&wall_probability) {
        return Err(GenerateError::InvalidWallProbability(wall_probability));
    }

    let mut grid = Grid::walled(rows, columns);
    for row in 1..rows - 1 {
        for col in 1..columns - 1 {
            if rng.gen_bool(wall_probability) {
                grid.set(Point { row, col }, Cell::Wall);
            }
        }
    }

    // resampling below only terminates if there is room for both markers
    let free = grid.count(Cell::Free);
    if free < 2 {
        return Err(GenerateError::NotEnoughFreeCells { free });
    }

    let start = place_on_free_cell(&mut grid, Cell::Start, rng);
    let goal = place_on_free_cell(&mut grid, Cell::Goal, rng);

    debug!(
        "generated {}x{} maze with {} walls, start={} goal={}",
        rows,
        columns,
        grid.count(Cell::Wall),
        start,
        goal
    );

    Ok(grid)
}

/// Draw interior coordinates until one is free and mark it with `marker`
fn place_on_free_cell<R: Rng + ?Sized>(grid: &mut Grid, marker: Cell, rng: &mut R) -> Point {
    loop {
        let point = Point {
            row: rng.gen_range(1..grid.rows() - 1),
            col: rng.gen_range(1..grid.columns() - 1),
        };
        if grid.get(point) == Some(Cell::Free) {
            grid.set(point, marker);
            return point;
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use quickcheck::{quickcheck, TestResult};
    use rand::{rngs::StdRng, SeedableRng};

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            generate(2, 9, 0.3, &mut rng(0)),
            Err(GenerateError::InvalidDimensions {
                rows: 2,
                columns: 9
            })
        );
        assert_eq!(
            generate(7, 0, 0.3, &mut rng(0)),
            Err(GenerateError::InvalidDimensions {
                rows: 7,
                columns: 0
            })
        );
    }

    #[test]
    fn test_invalid_wall_probability() {
        assert!(matches!(
            generate(7, 9, 1.5, &mut rng(0)),
            Err(GenerateError::InvalidWallProbability(_))
        ));
        assert!(matches!(
            generate(7, 9, -0.1, &mut rng(0)),
            Err(GenerateError::InvalidWallProbability(_))
        ));
        assert!(matches!(
            generate(7, 9, f64::NAN, &mut rng(0)),
            Err(GenerateError::InvalidWallProbability(_))
        ));
    }

    #[test]
    fn test_smallest_maze_has_no_room() {
        // a 3x3 maze has a single interior cell
        assert_eq!(
            generate(3, 3, 0.0, &mut rng(0)),
            Err(GenerateError::NotEnoughFreeCells { free: 1 })
        );
    }

    #[test]
    fn test_all_walls() {
        assert_eq!(
            generate(6, 6, 1.0, &mut rng(3)),
            Err(GenerateError::NotEnoughFreeCells { free: 0 })
        );
    }

    #[test]
    fn test_two_interior_cells() {
        let grid = generate(3, 4, 0.0, &mut rng(11)).unwrap();
        let mut markers = [grid.start().unwrap(), grid.goal().unwrap()];
        markers.sort_by_key(|p| p.col);
        assert_eq!(markers, [Point::new(1, 1), Point::new(1, 2)]);
    }

    #[test]
    fn test_no_walls_inside() {
        let grid = generate(7, 9, 0.0, &mut rng(5)).unwrap();
        assert_eq!(grid.count(Cell::Free), 5 * 7 - 2);
        assert_eq!(grid.count(Cell::Wall), 7 * 9 - 5 * 7);
        assert!(grid.solve().is_found());
    }

    #[test]
    fn test_same_seed_same_maze() {
        let settings = MazeSettings::default();
        assert_eq!(
            settings.generate(&mut rng(42)).unwrap(),
            settings.generate(&mut rng(42)).unwrap()
        );
    }

    #[test]
    fn test_default_settings() {
        let grid = MazeSettings::default().generate(&mut rng(1)).unwrap();
        assert_eq!(grid.rows(), 7);
        assert_eq!(grid.columns(), 9);
    }

    #[test]
    fn quickcheck_generated_invariants() {
        fn prop(seed: u64, rows: u8, columns: u8, density: u8) -> TestResult {
            let rows = 3 + rows as usize % 20;
            let columns = 3 + columns as usize % 20;
            let wall_probability = (density % 101) as f64 / 100.0;

            let grid = match generate(rows, columns, wall_probability, &mut rng(seed)) {
                Ok(grid) => grid,
                Err(GenerateError::NotEnoughFreeCells { .. }) => return TestResult::discard(),
                Err(e) => return TestResult::error(e.to_string()),
            };

            let border_is_wall = grid
                .points()
                .filter(|p| grid.is_border(*p))
                .all(|p| grid.get(p) == Some(Cell::Wall));
            let one_of_each = grid.count(Cell::Start) == 1 && grid.count(Cell::Goal) == 1;

            TestResult::from_bool(
                grid.rows() == rows
                    && grid.columns() == columns
                    && border_is_wall
                    && one_of_each
                    && grid.start() != grid.goal(),
            )
        }
        quickcheck(prop as fn(u64, u8, u8, u8) -> TestResult);
    }
}
