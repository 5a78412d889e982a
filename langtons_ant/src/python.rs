//! Python bindings, so a Python front end (pygame, matplotlib, ...) can drive the engine
//! and only handle the drawing.

use crate::ant::{Heading, StepResult};
use crate::error::SimulationError;
use crate::grid::{Color, Coordinate};
use crate::simulation::{Simulation, SimulationConfig};
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(error: SimulationError) -> PyErr {
    match error {
        SimulationError::InvalidConfig(_)
        | SimulationError::Pattern(_)
        | SimulationError::Json(_) => PyValueError::new_err(error.to_string()),
        SimulationError::Io(_) => PyIOError::new_err(error.to_string()),
        SimulationError::OutOfBounds { .. }
        | SimulationError::CoordinateOverflow { .. }
        | SimulationError::Halted => {
            PyRuntimeError::new_err(error.to_string())
        }
    }
}

fn heading_name(heading: Heading) -> &'static str {
    match heading {
        Heading::North => "north",
        Heading::East => "east",
        Heading::South => "south",
        Heading::West => "west",
    }
}

/// Represents the outcome of one step.
#[derive(Clone)]
#[pyclass(name = "StepResult", module = "langtons_ant", get_all)]
pub struct PyStepResult {
    /// The cell that was flipped, as `(x, y)`.
    pub old_position: (i64, i64),
    /// Where the ant is now, as `(x, y)`.
    pub new_position: (i64, i64),
    /// Whether the flipped cell was black before the step.
    pub was_black: bool,
    /// Whether the flipped cell is now black.
    pub black: bool,
    /// The heading of the ant after the step.
    pub heading: String,
}

impl From<StepResult> for PyStepResult {
    fn from(step: StepResult) -> PyStepResult {
        PyStepResult {
            old_position: (step.old_position.x, step.old_position.y),
            new_position: (step.new_position.x, step.new_position.y),
            was_black: step.color_before == Color::Black,
            black: step.color_after == Color::Black,
            heading: heading_name(step.new_heading).to_string(),
        }
    }
}

#[pyclass(name = "Simulation", module = "langtons_ant")]
pub struct PySimulation {
    inner: Simulation,
}

#[pymethods]
impl PySimulation {
    /// Creates a new simulation.
    ///
    /// # Arguments
    /// * `width` - Width of a bounded grid. Leave out for an unbounded grid.
    /// * `height` - Height of a bounded grid. Leave out for an unbounded grid.
    /// * `start` - The starting cell as `(x, y)`. Defaults to the grid center.
    /// * `pattern` - Initial coloring in the text pattern format.
    /// * `trace_file` - Where to save a JSON trace of every step.
    #[new]
    #[pyo3(signature = (width=None, height=None, start=None, pattern=None, trace_file=None))]
    pub fn new(
        width: Option<usize>,
        height: Option<usize>,
        start: Option<(i64, i64)>,
        pattern: Option<String>,
        trace_file: Option<String>,
    ) -> PyResult<PySimulation> {
        let mut config = match (width, height) {
            (Some(width), Some(height)) => SimulationConfig::bounded(width, height),
            (None, None) => SimulationConfig::unbounded(),
            _ => {
                return Err(PyValueError::new_err(
                    "width and height must be given together",
                ))
            }
        };
        config.start_position = start.map(Coordinate::from);
        config.pattern = pattern;
        config.trace_file = trace_file;

        let inner = Simulation::new(config).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    /// Advances the ant by one step.
    pub fn step(&mut self) -> PyResult<PyStepResult> {
        self.inner
            .step()
            .map(PyStepResult::from)
            .map_err(to_py_err)
    }

    /// Advances the ant by up to `steps` steps and returns every result.
    pub fn run(&mut self, steps: u64) -> PyResult<Vec<PyStepResult>> {
        let mut results = Vec::with_capacity(steps.min(4096) as usize);
        for _ in 0..steps {
            results.push(self.step()?);
        }
        Ok(results)
    }

    /// Whether the cell at `(x, y)` is black.
    pub fn is_black(&self, x: i64, y: i64) -> bool {
        self.inner.grid().color_at(Coordinate::new(x, y)) == Color::Black
    }

    /// Puts the simulation back in its initial state.
    pub fn reset(&mut self) -> PyResult<()> {
        self.inner.reset().map_err(to_py_err)
    }

    /// Saves the trace, if one is being recorded.
    pub fn finish(&mut self) -> PyResult<()> {
        self.inner.finish().map_err(to_py_err)
    }

    #[getter]
    pub fn position(&self) -> (i64, i64) {
        let position = self.inner.ant().position();
        (position.x, position.y)
    }

    #[getter]
    pub fn heading(&self) -> &'static str {
        heading_name(self.inner.ant().heading())
    }

    #[getter]
    pub fn iteration(&self) -> u64 {
        self.inner.iteration()
    }

    #[getter]
    pub fn halted(&self) -> bool {
        self.inner.is_halted()
    }
}

#[pymodule]
fn langtons_ant(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimulation>()?;
    m.add_class::<PyStepResult>()?;
    Ok(())
}
