use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Largest number of cells a dense grid or pattern may hold.
pub const MAX_CELLS: usize = 1 << 26;

/// A cell location. `y` grows towards the south.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub fn new(x: i64, y: i64) -> Coordinate {
        Coordinate { x, y }
    }

    /// `None` when the result falls outside of the `i64` coordinate space.
    pub fn offset(self, dx: i64, dy: i64) -> Option<Coordinate> {
        Some(Coordinate {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl From<(i64, i64)> for Coordinate {
    fn from((x, y): (i64, i64)) -> Coordinate {
        Coordinate { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The two states a cell can be in. Cells that were never written are white.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn flipped(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn char(self) -> char {
        match self {
            Color::White => '.',
            Color::Black => '#',
        }
    }

    pub fn from_char(value: char) -> Option<Color> {
        match value {
            '.' => Some(Color::White),
            '#' => Some(Color::Black),
            _ => None,
        }
    }
}

/// A finite `width x height` region whose top left cell is `(0, 0)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: usize,
    pub height: usize,
}

impl Bounds {
    pub fn new(width: usize, height: usize) -> Bounds {
        Bounds { width, height }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u64) < self.width as u64
            && (coord.y as u64) < self.height as u64
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.width / 2) as i64, (self.height / 2) as i64)
    }

    /// Number of cells, or `None` if it doesn't fit in a `usize`.
    pub fn area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Authoritative store of cell colors.
///
/// `set_color` and `toggle_color` are the only ways a cell changes, so anything
/// that wants to observe color changes only has to watch those two calls.
pub trait Grid: Send + Sync {
    /// Color of the cell. Never fails; unknown cells are white.
    fn color_at(&self, coord: Coordinate) -> Color;

    fn set_color(&mut self, coord: Coordinate, color: Color);

    /// Flips the cell and returns its new color.
    fn toggle_color(&mut self, coord: Coordinate) -> Color {
        let color = self.color_at(coord).flipped();
        self.set_color(coord, color);
        color
    }

    /// `None` for grids without a boundary.
    fn bounds(&self) -> Option<Bounds> {
        None
    }

    fn contains(&self, coord: Coordinate) -> bool {
        self.bounds().map_or(true, |bounds| bounds.contains(coord))
    }

    /// All black cells, sorted by `(x, y)`.
    fn black_cells(&self) -> Vec<Coordinate>;

    fn black_count(&self) -> usize {
        self.black_cells().len()
    }
}

pub fn create_grid(bounds: Option<Bounds>) -> Result<Box<dyn Grid>, SimulationError> {
    match bounds {
        None => Ok(Box::new(SparseGrid::new())),
        Some(bounds) => Ok(Box::new(BoundedGrid::new(bounds)?)),
    }
}

/// Unbounded grid that only remembers its black cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseGrid {
    black: HashSet<Coordinate>,
}

impl SparseGrid {
    pub fn new() -> SparseGrid {
        SparseGrid::default()
    }
}

impl Grid for SparseGrid {
    fn color_at(&self, coord: Coordinate) -> Color {
        if self.black.contains(&coord) {
            Color::Black
        } else {
            Color::White
        }
    }

    fn set_color(&mut self, coord: Coordinate, color: Color) {
        match color {
            Color::Black => self.black.insert(coord),
            Color::White => self.black.remove(&coord),
        };
    }

    fn black_cells(&self) -> Vec<Coordinate> {
        let mut cells: Vec<Coordinate> = self.black.iter().copied().collect();
        cells.sort();
        cells
    }

    fn black_count(&self) -> usize {
        self.black.len()
    }
}

/// Fixed size grid backed by a dense row major vector.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedGrid {
    bounds: Bounds,
    cells: Vec<Color>,
}

impl BoundedGrid {
    pub fn new(bounds: Bounds) -> Result<BoundedGrid, SimulationError> {
        let area = bounds
            .area()
            .filter(|area| *area <= MAX_CELLS)
            .ok_or_else(|| {
                SimulationError::InvalidConfig(format!(
                    "grid of {} is larger than {} cells",
                    bounds, MAX_CELLS
                ))
            })?;

        Ok(BoundedGrid {
            bounds,
            cells: vec![Color::White; area],
        })
    }

    pub fn width(&self) -> usize {
        self.bounds.width
    }

    pub fn height(&self) -> usize {
        self.bounds.height
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        if !self.bounds.contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.bounds.width + coord.x as usize)
    }
}

impl Grid for BoundedGrid {
    fn color_at(&self, coord: Coordinate) -> Color {
        self.index(coord)
            .map_or(Color::White, |index| self.cells[index])
    }

    fn set_color(&mut self, coord: Coordinate, color: Color) {
        match self.index(coord) {
            Some(index) => self.cells[index] = color,
            None => warn!(%coord, bounds = %self.bounds, "dropping write outside of grid"),
        }
    }

    fn toggle_color(&mut self, coord: Coordinate) -> Color {
        match self.index(coord) {
            Some(index) => {
                self.cells[index] = self.cells[index].flipped();
                self.cells[index]
            }
            None => {
                warn!(%coord, bounds = %self.bounds, "dropping toggle outside of grid");
                Color::White
            }
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        Some(self.bounds)
    }

    fn black_cells(&self) -> Vec<Coordinate> {
        // Row major order is not (x, y) order, so sort like the sparse grid does
        let mut cells: Vec<Coordinate> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, color)| **color == Color::Black)
            .map(|(index, _)| {
                Coordinate::new(
                    (index % self.bounds.width) as i64,
                    (index / self.bounds.width) as i64,
                )
            })
            .collect();
        cells.sort();
        cells
    }

    fn black_count(&self) -> usize {
        self.cells.iter().filter(|color| **color == Color::Black).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids() -> Vec<Box<dyn Grid>> {
        vec![
            create_grid(None).unwrap(),
            create_grid(Some(Bounds::new(10, 10))).unwrap(),
        ]
    }

    #[test]
    fn when_reading_a_cell_that_was_never_set_it_is_white() {
        for grid in grids() {
            assert_eq!(grid.color_at(Coordinate::new(3, 4)), Color::White);
            assert_eq!(grid.color_at(Coordinate::new(-7, 12)), Color::White);
            assert_eq!(grid.black_count(), 0);
        }
    }

    #[test]
    fn when_setting_a_cell_the_new_color_is_returned_on_read() {
        for mut grid in grids() {
            grid.set_color(Coordinate::new(2, 5), Color::Black);

            assert_eq!(grid.color_at(Coordinate::new(2, 5)), Color::Black);
            assert_eq!(grid.color_at(Coordinate::new(5, 2)), Color::White);
        }
    }

    #[test]
    fn when_setting_the_same_color_twice_the_grid_is_unchanged() {
        for mut grid in grids() {
            grid.set_color(Coordinate::new(1, 1), Color::Black);
            let once = grid.black_cells();
            grid.set_color(Coordinate::new(1, 1), Color::Black);

            assert_eq!(grid.black_cells(), once);
            assert_eq!(grid.black_count(), 1);
        }
    }

    #[test]
    fn when_toggling_a_cell_twice_the_original_color_is_restored() {
        for mut grid in grids() {
            let coord = Coordinate::new(4, 4);
            grid.set_color(Coordinate::new(0, 0), Color::Black);

            assert_eq!(grid.toggle_color(coord), Color::Black);
            assert_eq!(grid.toggle_color(coord), Color::White);
            assert_eq!(grid.toggle_color(Coordinate::new(0, 0)), Color::White);
            assert_eq!(grid.toggle_color(Coordinate::new(0, 0)), Color::Black);
        }
    }

    #[test]
    fn when_setting_a_cell_white_on_a_sparse_grid_it_is_forgotten() {
        let mut grid = SparseGrid::new();
        grid.set_color(Coordinate::new(-3, 8), Color::Black);
        grid.set_color(Coordinate::new(-3, 8), Color::White);

        assert_eq!(grid, SparseGrid::new());
    }

    #[test]
    fn when_listing_black_cells_they_are_sorted_by_x_then_y() {
        for mut grid in grids() {
            grid.set_color(Coordinate::new(3, 1), Color::Black);
            grid.set_color(Coordinate::new(1, 3), Color::Black);
            grid.set_color(Coordinate::new(1, 2), Color::Black);

            assert_eq!(
                grid.black_cells(),
                vec![
                    Coordinate::new(1, 2),
                    Coordinate::new(1, 3),
                    Coordinate::new(3, 1)
                ]
            );
        }
    }

    #[test]
    fn when_writing_outside_of_a_bounded_grid_the_write_is_dropped() {
        let mut grid = BoundedGrid::new(Bounds::new(4, 4)).unwrap();
        grid.set_color(Coordinate::new(4, 0), Color::Black);
        grid.set_color(Coordinate::new(-1, 2), Color::Black);

        assert_eq!(grid.toggle_color(Coordinate::new(0, 9)), Color::White);
        assert_eq!(grid.black_count(), 0);
        assert_eq!(grid.color_at(Coordinate::new(4, 0)), Color::White);
    }

    #[test]
    fn when_checking_bounds_only_the_region_from_the_origin_is_contained() {
        let grid = BoundedGrid::new(Bounds::new(80, 60)).unwrap();

        assert!(grid.contains(Coordinate::new(0, 0)));
        assert!(grid.contains(Coordinate::new(79, 59)));
        assert!(!grid.contains(Coordinate::new(80, 59)));
        assert!(!grid.contains(Coordinate::new(79, 60)));
        assert!(!grid.contains(Coordinate::new(-1, 0)));
        assert_eq!(grid.bounds().unwrap().center(), Coordinate::new(40, 30));
        assert!(SparseGrid::new().contains(Coordinate::new(i64::MIN, i64::MAX)));
    }

    #[test]
    fn when_offsetting_past_the_coordinate_limits_no_coordinate_is_returned() {
        assert_eq!(
            Coordinate::new(3, -4).offset(-1, 1),
            Some(Coordinate::new(2, -3))
        );
        assert_eq!(Coordinate::new(i64::MAX, 0).offset(1, 0), None);
        assert_eq!(Coordinate::new(0, i64::MIN).offset(0, -1), None);
    }

    #[test]
    fn when_computing_the_area_of_huge_bounds_overflow_is_reported() {
        assert_eq!(Bounds::new(80, 60).area(), Some(4800));
        assert_eq!(Bounds::new(usize::MAX, 2).area(), None);
    }

    #[test]
    fn when_creating_a_bounded_grid_larger_than_the_cell_limit_an_error_is_returned() {
        assert!(matches!(
            BoundedGrid::new(Bounds::new(usize::MAX, 2)),
            Err(SimulationError::InvalidConfig(_))
        ));
        assert!(create_grid(Some(Bounds::new(MAX_CELLS, 2))).is_err());
    }
}
