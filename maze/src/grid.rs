use crate::find::{solve, MapStorage, MapTrait, NodeReference, SearchOutcome};
use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Wall,
    Free,
    Start,
    Goal,
}

impl Cell {
    /// Everything except walls can be walked on, including the start and goal markers
    pub fn is_traversable(self) -> bool {
        self != Cell::Wall
    }

    pub fn as_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Free => '.',
            Cell::Start => 'S',
            Cell::Goal => 'G',
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '#' | 'X' => Ok(Cell::Wall),
            '.' => Ok(Cell::Free),
            'S' => Ok(Cell::Start),
            'G' => Ok(Cell::Goal),
            _ => Err(anyhow!("Invalid cell: {:?}", c)),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four moves in the order the search expands them
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Move one cell in the given direction, `None` when that would leave a
    /// `rows` x `columns` area
    pub fn step(&self, direction: Direction, rows: usize, columns: usize) -> Option<Point> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };

        (row < rows && col < columns).then_some(Point { row, col })
    }

    /// True if the two points differ by exactly one unit along exactly one axis
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A rectangular maze of cells, stored row by row.
///
/// The text form (see [`Display`] and [`FromStr`]) uses one line per row with
/// `#` for walls, `.` for free cells and `S`/`G` for the start and goal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridShape")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

/// Unchecked serialized form of a [`Grid`], validated by `TryFrom`
#[derive(Deserialize)]
struct GridShape {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

impl TryFrom<GridShape> for Grid {
    type Error = anyhow::Error;

    fn try_from(shape: GridShape) -> Result<Self, Self::Error> {
        let grid = Grid::from_cells(shape.cells)?;
        if grid.rows != shape.rows || grid.columns != shape.columns {
            bail!(
                "Grid declares {}x{} cells but holds {}x{}",
                shape.rows,
                shape.columns,
                grid.rows,
                grid.columns
            );
        }
        Ok(grid)
    }
}

impl Grid {
    /// Build a grid from rows of cells. All rows must have the same length
    /// and there can be at most one start and one goal.
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> anyhow::Result<Self> {
        let Some(columns) = cells.first().map(Vec::len) else {
            bail!("Grid must have at least one row");
        };

        if let Some((row, line)) = cells.iter().enumerate().find(|(_, r)| r.len() != columns) {
            bail!(
                "Row {} has {} cells but the first row has {}",
                row,
                line.len(),
                columns
            );
        }

        let grid = Grid {
            rows: cells.len(),
            columns,
            cells,
        };
        for marker in [Cell::Start, Cell::Goal] {
            let count = grid.count(marker);
            if count > 1 {
                bail!("Grid has {} {:?} cells, at most one is allowed", count, marker);
            }
        }

        Ok(grid)
    }

    /// A grid where every cell is free
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![Cell::Free; columns]; rows],
        }
    }

    /// A grid with a wall around the border and a free interior
    pub fn walled(rows: usize, columns: usize) -> Self {
        let mut grid = Self::new(rows, columns);
        for point in grid.points() {
            if grid.is_border(point) {
                grid.cells[point.row][point.col] = Cell::Wall;
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, point: Point) -> Option<Cell> {
        self.cells.get(point.row)?.get(point.col).copied()
    }

    /// Overwrite a single cell.
    ///
    /// Panics if the point lies outside the grid.
    pub fn set(&mut self, point: Point, cell: Cell) {
        self.cells[point.row][point.col] = cell;
    }

    pub fn is_border(&self, point: Point) -> bool {
        point.row == 0
            || point.col == 0
            || point.row + 1 == self.rows
            || point.col + 1 == self.columns
    }

    /// All coordinates of the grid in row-major order
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| Point { row, col }))
    }

    /// First cell (in row-major order) holding the given value
    pub fn find(&self, cell: Cell) -> Option<Point> {
        self.points().find(|p| self.cells[p.row][p.col] == cell)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|c| **c == cell).count()
    }

    pub fn start(&self) -> Option<Point> {
        self.find(Cell::Start)
    }

    pub fn goal(&self) -> Option<Point> {
        self.find(Cell::Goal)
    }

    /// Search for a path between this grid's own start and goal markers.
    ///
    /// Parsed and generated grids hold at most one of each; if [`Grid::set`]
    /// placed more, the first in row-major order is used.
    pub fn solve(&self) -> SearchOutcome<Point> {
        match (self.start(), self.goal()) {
            (Some(start), Some(goal)) => solve(self, start, goal),
            _ => {
                log::warn!("grid has no start or goal marker");
                SearchOutcome::NoPathFound
            }
        }
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = anyhow::Error;

    /// Parse the text form. Surrounding whitespace on each line and blank
    /// lines are ignored so that indented string literals can be used.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(Cell::try_from).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<Vec<Cell>>, _>>()?;

        Grid::from_cells(cells)
    }
}

/// A MapStorage that keeps one value per grid cell in a single row-major vec
#[derive(Debug)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl MapTrait for Grid {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_traversable(&self, node: Self::Reference) -> bool {
        self.get(node).is_some_and(Cell::is_traversable)
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        let mut points = Vec::with_capacity(4);

        // walls are never expanded
        if self.is_traversable(node) {
            points.extend(
                Direction::ALL
                    .into_iter()
                    .filter_map(|d| node.step(d, self.rows, self.columns))
                    .filter(|p| self.cells[p.row][p.col].is_traversable()),
            );
        }

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            columns: self.columns,
            values: vec![T::default(); self.rows * self.columns],
        }
    }
}
