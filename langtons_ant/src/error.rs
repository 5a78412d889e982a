use crate::ant::Heading;
use crate::grid::{Bounds, Coordinate};
use thiserror::Error;

/// Errors raised while building or stepping a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The ant would leave a bounded grid. Nothing was mutated.
    #[error("ant at {position} heading {heading:?} would leave the {bounds} grid")]
    OutOfBounds {
        position: Coordinate,
        heading: Heading,
        bounds: Bounds,
    },

    /// The ant would step past the edge of the `i64` coordinate space. Nothing was mutated.
    #[error("ant at {position} heading {heading:?} would leave the coordinate space")]
    CoordinateOverflow {
        position: Coordinate,
        heading: Heading,
    },

    /// The simulation already hit a terminal condition and can't step anymore.
    #[error("simulation is halted")]
    Halted,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while parsing a text pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is missing the `rows N` / `cols M` header")]
    MissingHeader,

    #[error("invalid cell {value:?} at row {row}, col {col}")]
    InvalidCell { row: usize, col: usize, value: char },

    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("pattern of {width} x {height} cells is too large")]
    TooLarge { width: usize, height: usize },

    #[error("pattern has {found} rows, expected at most {expected}")]
    TooManyRows { expected: usize, found: usize },
}
