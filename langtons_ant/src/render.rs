use crate::ant::{Ant, Heading, StepResult};
use crate::grid::{Color, Coordinate, Grid};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color as TermColor, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Consumes the delta of each step. Implementations must only touch the cells named
/// in the `StepResult`, never rescan the grid.
pub trait Renderer {
    fn render(&mut self, iteration: u64, step: &StepResult) -> io::Result<()>;
}

/// Renderer for headless runs.
pub struct NoOpRenderer;

impl Renderer for NoOpRenderer {
    fn render(&mut self, _iteration: u64, _step: &StepResult) -> io::Result<()> {
        Ok(())
    }
}

// Title and iteration counter sit above the grid
const HEADER_LINES: u16 = 2;

/// Draws a fixed window of the grid to a terminal.
pub struct TerminalRenderer<W: Write> {
    out: W,
    origin: Coordinate,
    width: u16,
    height: u16,
}

impl<W: Write> TerminalRenderer<W> {
    /// # Arguments
    /// * `out` - Where to write the terminal commands, usually `stdout()`.
    /// * `origin` - Grid cell shown in the top left corner.
    /// * `width` - Number of grid columns shown.
    /// * `height` - Number of grid rows shown.
    pub fn new(out: W, origin: Coordinate, width: u16, height: u16) -> TerminalRenderer<W> {
        TerminalRenderer {
            out,
            origin,
            width,
            height,
        }
    }

    /// Clears the screen and draws the whole window once.
    pub fn draw(&mut self, grid: &dyn Grid, ant: &Ant, iteration: u64) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), Hide, MoveTo(0, 0), Print("Langton's Ant"))?;
        self.draw_counter(iteration)?;

        for row in 0..self.height {
            queue!(self.out, MoveTo(0, HEADER_LINES + row))?;
            for col in 0..self.width {
                let color = self
                    .origin
                    .offset(col as i64, row as i64)
                    .map_or(Color::White, |coord| grid.color_at(coord));
                queue!(
                    self.out,
                    SetForegroundColor(cell_color(color)),
                    Print(color.char()),
                    SetForegroundColor(TermColor::Reset)
                )?;
            }
        }

        self.draw_ant(ant.position(), ant.heading())?;
        self.out.flush()
    }

    /// Restores the cursor and moves it below the window.
    pub fn finish(&mut self) -> io::Result<()> {
        execute!(self.out, MoveTo(0, HEADER_LINES + self.height), Show, Print("\n"))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn screen_position(&self, coord: Coordinate) -> Option<(u16, u16)> {
        let col = coord.x.checked_sub(self.origin.x)?;
        let row = coord.y.checked_sub(self.origin.y)?;
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some((col as u16, HEADER_LINES + row as u16))
    }

    fn draw_cell(&mut self, coord: Coordinate, color: Color) -> io::Result<()> {
        if let Some((col, row)) = self.screen_position(coord) {
            queue!(
                self.out,
                MoveTo(col, row),
                SetForegroundColor(cell_color(color)),
                Print(color.char()),
                SetForegroundColor(TermColor::Reset)
            )?;
        }
        Ok(())
    }

    fn draw_ant(&mut self, coord: Coordinate, heading: Heading) -> io::Result<()> {
        if let Some((col, row)) = self.screen_position(coord) {
            queue!(
                self.out,
                MoveTo(col, row),
                SetForegroundColor(TermColor::Red),
                Print(ant_marker(heading)),
                SetForegroundColor(TermColor::Reset)
            )?;
        }
        Ok(())
    }

    fn draw_counter(&mut self, iteration: u64) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(0, 1),
            Clear(ClearType::CurrentLine),
            Print("Iteration: "),
            Print(iteration.to_string())
        )
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, iteration: u64, step: &StepResult) -> io::Result<()> {
        self.draw_cell(step.old_position, step.color_after)?;
        self.draw_ant(step.new_position, step.new_heading)?;
        self.draw_counter(iteration)?;
        self.out.flush()
    }
}

fn cell_color(color: Color) -> TermColor {
    match color {
        Color::White => TermColor::Grey,
        Color::Black => TermColor::White,
    }
}

fn ant_marker(heading: Heading) -> char {
    match heading {
        Heading::North => '^',
        Heading::East => '>',
        Heading::South => 'v',
        Heading::West => '<',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SparseGrid;

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn when_drawing_the_full_window_every_cell_and_the_ant_are_printed() {
        let mut grid = SparseGrid::new();
        grid.set_color(Coordinate::new(1, 0), Color::Black);
        let ant = Ant::new(Coordinate::new(0, 1), Heading::East);
        let mut renderer = TerminalRenderer::new(Vec::new(), Coordinate::new(0, 0), 3, 2);

        renderer.draw(&grid, &ant, 0).unwrap();
        let text = output(renderer);

        assert!(text.contains("Langton's Ant"));
        assert!(text.contains("Iteration: 0"));
        assert_eq!(text.matches('#').count(), 1);
        assert_eq!(text.matches('.').count(), 5);
        assert!(text.contains('>'));
    }

    #[test]
    fn when_rendering_a_step_only_the_changed_cell_and_the_ant_are_drawn() {
        let mut renderer = TerminalRenderer::new(Vec::new(), Coordinate::new(-5, -5), 10, 10);
        let step = StepResult {
            old_position: Coordinate::new(0, 0),
            new_position: Coordinate::new(1, 0),
            color_before: Color::White,
            color_after: Color::Black,
            new_heading: Heading::East,
        };

        renderer.render(1, &step).unwrap();
        let text = output(renderer);

        assert_eq!(text.matches('#').count(), 1);
        assert_eq!(text.matches('.').count(), 0);
        assert!(text.contains('>'));
        assert!(text.contains("Iteration: 1"));
    }

    #[test]
    fn when_rendering_a_step_outside_of_the_window_only_the_counter_is_drawn() {
        let mut renderer = TerminalRenderer::new(Vec::new(), Coordinate::new(0, 0), 4, 4);
        let step = StepResult {
            old_position: Coordinate::new(-2, 9),
            new_position: Coordinate::new(-3, 9),
            color_before: Color::Black,
            color_after: Color::White,
            new_heading: Heading::West,
        };

        renderer.render(12, &step).unwrap();
        let text = output(renderer);

        assert!(!text.contains('<'));
        assert!(!text.contains('.'));
        assert!(text.contains("Iteration: 12"));
    }

    #[test]
    fn when_the_window_reaches_past_the_coordinate_limits_those_cells_are_white() {
        let mut grid = SparseGrid::new();
        grid.set_color(Coordinate::new(i64::MAX, 0), Color::Black);
        let ant = Ant::new(Coordinate::new(i64::MAX - 1, 0), Heading::North);
        let mut renderer =
            TerminalRenderer::new(Vec::new(), Coordinate::new(i64::MAX - 1, 0), 3, 1);

        renderer.draw(&grid, &ant, 0).unwrap();
        let text = output(renderer);

        assert_eq!(text.matches('#').count(), 1);
        assert_eq!(text.matches('.').count(), 2);
        assert!(text.contains('^'));
    }

    #[test]
    fn when_rendering_a_step_far_from_the_window_nothing_overflows() {
        let mut renderer = TerminalRenderer::new(Vec::new(), Coordinate::new(1, 0), 4, 4);
        let step = StepResult {
            old_position: Coordinate::new(i64::MIN, 0),
            new_position: Coordinate::new(i64::MIN + 1, 0),
            color_before: Color::White,
            color_after: Color::Black,
            new_heading: Heading::East,
        };

        renderer.render(3, &step).unwrap();
        let text = output(renderer);

        assert!(!text.contains('#'));
        assert!(!text.contains('>'));
        assert!(text.contains("Iteration: 3"));
    }
}
