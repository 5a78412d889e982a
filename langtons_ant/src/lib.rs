//! # langtons_ant
//!
//! Engine for [Langton's Ant](https://en.wikipedia.org/wiki/Langton%27s_ant): a single
//! ant walking over a grid of white and black cells, turning right on white and left on
//! black, flipping the color of every cell it leaves.
//!
//! Drawing is left to the caller. Every step returns a [`StepResult`] describing the one
//! cell that changed and where the ant went, which is all a renderer needs.

pub mod ant;
pub mod error;
pub mod grid;
pub mod pattern;
pub mod render;
pub mod simulation;

mod trace;

#[cfg(feature = "python")]
mod python;

pub use ant::{Ant, Heading, StepResult, Turn};
pub use error::{PatternError, SimulationError};
pub use grid::{BoundedGrid, Bounds, Color, Coordinate, Grid, SparseGrid};
pub use pattern::Pattern;
pub use render::{NoOpRenderer, Renderer, TerminalRenderer};
pub use simulation::{BoundingBox, RandomFill, Simulation, SimulationConfig};
