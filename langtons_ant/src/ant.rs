use crate::error::SimulationError;
use crate::grid::{Color, Coordinate, Grid};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Represents the direction the ant is facing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

/// Clockwise order. Turning is a walk along this cycle.
const HEADINGS: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

impl Heading {
    pub fn turn(self, turn: Turn) -> Heading {
        let index = (self.index() as i8 + turn.sign()).rem_euclid(HEADINGS.len() as i8);
        HEADINGS[index as usize]
    }

    /// Unit move for this heading, with north being `y - 1`.
    pub fn displacement(self) -> (i64, i64) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    fn index(self) -> usize {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

impl Turn {
    /// The rule: turn right on white, left on black.
    pub fn for_color(color: Color) -> Turn {
        match color {
            Color::White => Turn::Clockwise,
            Color::Black => Turn::CounterClockwise,
        }
    }

    fn sign(self) -> i8 {
        match self {
            Turn::Clockwise => 1,
            Turn::CounterClockwise => -1,
        }
    }
}

/// Everything a renderer needs to redraw after one step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// The cell that was flipped.
    pub old_position: Coordinate,
    /// Where the ant is now.
    pub new_position: Coordinate,
    pub color_before: Color,
    pub color_after: Color,
    pub new_heading: Heading,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ant {
    position: Coordinate,
    heading: Heading,
}

impl Ant {
    pub fn new(position: Coordinate, heading: Heading) -> Ant {
        Ant { position, heading }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Heading and position the ant would end up with if its cell had `color`.
    /// The position is `None` past the edge of the coordinate space.
    pub fn next_move(&self, color: Color) -> (Heading, Option<Coordinate>) {
        let heading = self.heading.turn(Turn::for_color(color));
        let (dx, dy) = heading.displacement();
        (heading, self.position.offset(dx, dy))
    }

    /// Applies the rule once: turn, flip the current cell, move forward.
    ///
    /// On a bounded grid the destination is checked first. If it lies outside, the
    /// grid and the ant are left untouched and `OutOfBounds` is returned. The same
    /// goes for `CoordinateOverflow` at the limits of an unbounded grid.
    pub fn step(&mut self, grid: &mut dyn Grid) -> Result<StepResult, SimulationError> {
        let color_before = grid.color_at(self.position);
        let (heading, destination) = self.next_move(color_before);
        let destination = destination.ok_or(SimulationError::CoordinateOverflow {
            position: self.position,
            heading,
        })?;

        if let Some(bounds) = grid.bounds() {
            if !bounds.contains(destination) {
                return Err(SimulationError::OutOfBounds {
                    position: self.position,
                    heading,
                    bounds,
                });
            }
        }

        let old_position = self.position;
        let color_after = grid.toggle_color(old_position);
        self.position = destination;
        self.heading = heading;

        trace!(from = %old_position, to = %destination, ?heading, "ant stepped");

        Ok(StepResult {
            old_position,
            new_position: destination,
            color_before,
            color_after,
            new_heading: heading,
        })
    }
}
