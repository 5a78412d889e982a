//! Text patterns used to seed a grid before the ant starts walking.
//!
//! ```text
//! rows 2
//! cols 3
//! m .#.
//! m ##.
//! ```
//!
//! `.` is a white cell and `#` a black one. Rows missing at the end are white.

use crate::error::{PatternError, SimulationError};
use crate::grid::{Color, Coordinate, Grid, MAX_CELLS};
use regex::Regex;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl Pattern {
    pub fn parse(contents: &str) -> Result<Pattern, PatternError> {
        let metadata = Regex::new(r"rows (\d+)\s+cols (\d+)")
            .expect("header regex is valid")
            .captures(contents)
            .ok_or(PatternError::MissingHeader)?;

        let height: usize = metadata[1].parse().map_err(|_| PatternError::MissingHeader)?;
        let width: usize = metadata[2].parse().map_err(|_| PatternError::MissingHeader)?;

        let mut pattern = Pattern::empty(width, height)?;

        let rows: Vec<&str> = Regex::new(r"(?m)^\s*m (.*)$")
            .expect("row regex is valid")
            .captures_iter(contents)
            .filter_map(|captures| captures.get(1))
            .map(|row| row.as_str().trim())
            .collect();

        if rows.len() > height {
            return Err(PatternError::TooManyRows {
                expected: height,
                found: rows.len(),
            });
        }

        for (row, line) in rows.into_iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(PatternError::RowLength {
                    row,
                    expected: width,
                    found,
                });
            }

            for (col, value) in line.chars().enumerate() {
                let color =
                    Color::from_char(value).ok_or(PatternError::InvalidCell { row, col, value })?;
                pattern.cells[row * width + col] = color;
            }
        }

        Ok(pattern)
    }

    /// Copies the `width x height` region of `grid` starting at `origin`. Cells past the
    /// edge of the coordinate space are white.
    pub fn capture(
        grid: &dyn Grid,
        origin: Coordinate,
        width: usize,
        height: usize,
    ) -> Result<Pattern, PatternError> {
        let mut pattern = Pattern::empty(width, height)?;
        for row in 0..height {
            for col in 0..width {
                pattern.cells[row * width + col] = origin
                    .offset(col as i64, row as i64)
                    .map_or(Color::White, |coord| grid.color_at(coord));
            }
        }
        Ok(pattern)
    }

    /// Paints the black cells of the pattern onto `grid` with the top left cell at `origin`.
    ///
    /// White cells are left alone. Fails without touching the grid if any black cell
    /// falls outside a bounded grid or past the edge of the coordinate space.
    pub fn apply(&self, grid: &mut dyn Grid, origin: Coordinate) -> Result<(), SimulationError> {
        let cells = self
            .black_cells()
            .map(|(col, row)| origin.offset(col as i64, row as i64))
            .collect::<Option<Vec<Coordinate>>>()
            .ok_or_else(|| {
                SimulationError::InvalidConfig(format!(
                    "pattern at {} runs past the edge of the coordinate space",
                    origin
                ))
            })?;

        if let Some(outside) = cells.iter().find(|coord| !grid.contains(**coord)) {
            return Err(SimulationError::InvalidConfig(format!(
                "pattern cell {} is outside of the grid",
                outside
            )));
        }

        for coord in cells {
            grid.set_color(coord, Color::Black);
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    fn empty(width: usize, height: usize) -> Result<Pattern, PatternError> {
        let area = width
            .checked_mul(height)
            .filter(|area| *area <= MAX_CELLS)
            .ok_or(PatternError::TooLarge { width, height })?;

        Ok(Pattern {
            width,
            height,
            cells: vec![Color::White; area],
        })
    }

    fn black_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, color)| **color == Color::Black)
            .map(|(index, _)| (index % self.width, index / self.width))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows {}", self.height)?;
        write!(f, "cols {}", self.width)?;
        for row in self.cells.chunks(self.width.max(1)).take(self.height) {
            let line: String = row.iter().map(|color| color.char()).collect();
            write!(f, "\nm {}", line)?;
        }
        Ok(())
    }
}
