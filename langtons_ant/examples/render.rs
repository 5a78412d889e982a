use langtons_ant::{Coordinate, Simulation, SimulationConfig, SimulationError, TerminalRenderer};
use std::io::stdout;
use std::thread;
use std::time::Duration;

const GRID_SIZE: usize = 80;
const MAX_STEPS: u64 = 11_000;
const STEPS_PER_FRAME: u64 = 50;

fn main() -> Result<(), SimulationError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut simulation = Simulation::new(SimulationConfig::bounded(GRID_SIZE, GRID_SIZE))?;
    let mut renderer = TerminalRenderer::new(
        stdout(),
        Coordinate::new(0, 0),
        GRID_SIZE as u16,
        GRID_SIZE as u16,
    );

    renderer.draw(simulation.grid(), simulation.ant(), simulation.iteration())?;

    // The driver owns pacing; the engine only ever sees `run`
    let mut result = Ok(());
    while simulation.iteration() < MAX_STEPS {
        let steps = STEPS_PER_FRAME.min(MAX_STEPS - simulation.iteration());
        if let Err(error) = simulation.run(steps, &mut renderer) {
            result = Err(error);
            break;
        }
        thread::sleep(Duration::from_millis(16));
    }

    renderer.finish()?;
    match result {
        Err(SimulationError::OutOfBounds { .. }) => {
            println!("Ant left the grid after {} steps", simulation.iteration());
            Ok(())
        }
        other => other,
    }
}
