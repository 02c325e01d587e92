//! Random grid mazes and shortest paths through them.
//!
//! [`generate`] builds a walled grid with a start and a goal cell, [`solve`]
//! finds a shortest 4-connected path between two cells of any [`MapTrait`]
//! implementation, [`Grid`] being the one provided here.

pub mod find;
pub mod generate;
pub mod grid;

pub use find::{solve, MapStorage, MapTrait, NodeReference, PathResult, SearchOutcome};
pub use generate::{generate, GenerateError, MazeSettings};
pub use grid::{Cell, Grid, Point};
