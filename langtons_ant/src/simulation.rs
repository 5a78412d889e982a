use crate::ant::{Ant, Heading, StepResult};
use crate::error::SimulationError;
use crate::grid::{create_grid, Bounds, Color, Coordinate, Grid, MAX_CELLS};
use crate::pattern::Pattern;
use crate::render::Renderer;
use crate::trace::{create_trace_recorder, TraceRecorder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Largest `RandomFill::radius`, a 2001 x 2001 square.
pub const MAX_FILL_RADIUS: usize = 1_000;

/// Colors a square around the start cell black at random before the first step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomFill {
    /// Seed for the random number generator.
    pub seed: u64,
    /// Half the side of the square, so `radius = 2` fills a 5 x 5 square.
    pub radius: usize,
    /// Probability of each cell being black, in `[0, 1]`.
    pub density: f64,
}

/// Everything the driver decides before the simulation starts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting cell. Defaults to the center of a bounded grid, or the origin.
    pub start_position: Option<Coordinate>,
    pub start_heading: Heading,
    /// `None` for an unbounded grid.
    pub bounds: Option<Bounds>,
    /// Initial coloring in the text pattern format, centered on the start cell.
    pub pattern: Option<String>,
    pub random_fill: Option<RandomFill>,
    /// Where to write a JSON trace of every step. No trace is kept if `None`.
    pub trace_file: Option<String>,
}

impl SimulationConfig {
    pub fn unbounded() -> SimulationConfig {
        SimulationConfig::default()
    }

    pub fn bounded(width: usize, height: usize) -> SimulationConfig {
        SimulationConfig {
            bounds: Some(Bounds::new(width, height)),
            ..SimulationConfig::default()
        }
    }

    pub fn from_json(contents: &str) -> Result<SimulationConfig, SimulationError> {
        let config: SimulationConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_start(mut self, position: Coordinate) -> SimulationConfig {
        self.start_position = Some(position);
        self
    }

    pub fn with_heading(mut self, heading: Heading) -> SimulationConfig {
        self.start_heading = heading;
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> SimulationConfig {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_random_fill(mut self, fill: RandomFill) -> SimulationConfig {
        self.random_fill = Some(fill);
        self
    }

    pub fn with_trace_file(mut self, filename: &str) -> SimulationConfig {
        self.trace_file = Some(filename.to_string());
        self
    }

    pub fn start_position(&self) -> Coordinate {
        self.start_position
            .unwrap_or_else(|| self.bounds.map_or_else(Coordinate::default, |bounds| bounds.center()))
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if let Some(bounds) = self.bounds {
            if bounds.width == 0 || bounds.height == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "grid bounds must not be empty, got {}",
                    bounds
                )));
            }

            if bounds.area().map_or(true, |area| area > MAX_CELLS) {
                return Err(SimulationError::InvalidConfig(format!(
                    "grid of {} is larger than {} cells",
                    bounds, MAX_CELLS
                )));
            }

            if !bounds.contains(self.start_position()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "start position {} is outside of the {} grid",
                    self.start_position(),
                    bounds
                )));
            }
        }

        if let Some(fill) = &self.random_fill {
            if !(0.0..=1.0).contains(&fill.density) {
                return Err(SimulationError::InvalidConfig(format!(
                    "random fill density must be within [0, 1], got {}",
                    fill.density
                )));
            }

            if fill.radius > MAX_FILL_RADIUS {
                return Err(SimulationError::InvalidConfig(format!(
                    "random fill radius must be at most {}, got {}",
                    MAX_FILL_RADIUS, fill.radius
                )));
            }
        }

        Ok(())
    }
}

/// Smallest rectangle holding every cell the ant has stood on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl BoundingBox {
    pub fn around(coord: Coordinate) -> BoundingBox {
        BoundingBox {
            min: coord,
            max: coord,
        }
    }

    pub fn include(&mut self, coord: Coordinate) {
        self.min.x = self.min.x.min(coord.x);
        self.min.y = self.min.y.min(coord.y);
        self.max.x = self.max.x.max(coord.x);
        self.max.y = self.max.y.max(coord.y);
    }

    pub fn width(&self) -> u64 {
        self.max.x.abs_diff(self.min.x).saturating_add(1)
    }

    pub fn height(&self) -> u64 {
        self.max.y.abs_diff(self.min.y).saturating_add(1)
    }
}

/// A single ant on a two color grid.
/// Main entry point for drivers.
pub struct Simulation {
    config: SimulationConfig,
    grid: Box<dyn Grid>,
    ant: Ant,
    iteration: u64,
    halted: bool,
    bounding_box: BoundingBox,
    trace_recorder: Box<dyn TraceRecorder>,
}

impl Simulation {
    /// Creates a new simulation.
    ///
    /// # Arguments
    /// * `config` - Start cell, heading, optional bounds and initial coloring.
    pub fn new(config: SimulationConfig) -> Result<Simulation, SimulationError> {
        config.validate()?;

        let start = config.start_position();
        let grid = Simulation::initial_grid(&config)?;
        let trace_recorder = create_trace_recorder(config.trace_file.clone(), &config);

        info!(
            %start,
            heading = ?config.start_heading,
            bounds = ?config.bounds,
            black = grid.black_count(),
            "created simulation"
        );

        Ok(Simulation {
            ant: Ant::new(start, config.start_heading),
            grid,
            iteration: 0,
            halted: false,
            bounding_box: BoundingBox::around(start),
            trace_recorder,
            config,
        })
    }

    /// Puts the grid and ant back in their initial state and drops any recorded trace.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.grid = Simulation::initial_grid(&self.config)?;
        self.ant = Ant::new(self.config.start_position(), self.config.start_heading);
        self.iteration = 0;
        self.halted = false;
        self.bounding_box = BoundingBox::around(self.ant.position());
        self.trace_recorder.clear();

        debug!("simulation reset");
        Ok(())
    }

    /// Advances the ant by one step.
    ///
    /// After an `OutOfBounds` or `CoordinateOverflow` error the simulation is halted and every further call
    /// returns `Halted`.
    pub fn step(&mut self) -> Result<StepResult, SimulationError> {
        if self.halted {
            return Err(SimulationError::Halted);
        }

        match self.ant.step(self.grid.as_mut()) {
            Ok(result) => {
                self.iteration += 1;
                self.bounding_box.include(result.new_position);
                self.trace_recorder.log_step(self.iteration, &result);
                Ok(result)
            }
            Err(error) => {
                self.halted = true;
                warn!(iteration = self.iteration, %error, "simulation halted");

                self.trace_recorder.log_halt(error.to_string());
                if let Err(save_error) = self.trace_recorder.save() {
                    warn!(%save_error, "could not save trace");
                }
                Err(error)
            }
        }
    }

    /// Steps up to `max_steps` times, handing every result to `renderer`.
    ///
    /// Returns the number of steps taken. Stops early with the error if the ant
    /// leaves a bounded grid; `iteration()` still tells how far it got.
    pub fn run(
        &mut self,
        max_steps: u64,
        renderer: &mut dyn Renderer,
    ) -> Result<u64, SimulationError> {
        for _ in 0..max_steps {
            let result = self.step()?;
            renderer.render(self.iteration, &result)?;
        }
        Ok(max_steps)
    }

    /// Writes the trace, if one is being recorded.
    pub fn finish(&mut self) -> Result<(), SimulationError> {
        self.trace_recorder.save()
    }

    pub fn grid(&self) -> &dyn Grid {
        self.grid.as_ref()
    }

    pub fn ant(&self) -> &Ant {
        &self.ant
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of completed steps.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn black_count(&self) -> usize {
        self.grid.black_count()
    }

    fn initial_grid(config: &SimulationConfig) -> Result<Box<dyn Grid>, SimulationError> {
        let mut grid = create_grid(config.bounds)?;
        let start = config.start_position();

        if let Some(contents) = &config.pattern {
            let pattern = Pattern::parse(contents)?;
            let origin = start
                .offset(
                    -((pattern.width() / 2) as i64),
                    -((pattern.height() / 2) as i64),
                )
                .ok_or_else(|| {
                    SimulationError::InvalidConfig(format!(
                        "pattern centered on {} runs past the edge of the coordinate space",
                        start
                    ))
                })?;
            pattern.apply(grid.as_mut(), origin)?;
        }

        if let Some(fill) = &config.random_fill {
            let mut rng = StdRng::seed_from_u64(fill.seed);
            // Bounded by MAX_FILL_RADIUS in `validate`
            let radius = fill.radius as i64;

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    // Draw for every cell so the coloring only depends on the seed
                    let black = rng.gen_bool(fill.density);
                    match start.offset(dx, dy) {
                        Some(coord) if black && grid.contains(coord) => {
                            grid.set_color(coord, Color::Black)
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(grid)
    }
}
