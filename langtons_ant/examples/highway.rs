use langtons_ant::{NoOpRenderer, Pattern, Simulation, SimulationConfig, SimulationError};
use std::env;
use std::fs;

fn main() -> Result<(), SimulationError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Optional JSON config as the first argument, e.g. `{ "trace_file": "/tmp/ant.json" }`
    let config = match env::args().nth(1) {
        Some(path) => SimulationConfig::from_json(&fs::read_to_string(path)?)?,
        None => SimulationConfig::unbounded(),
    };

    let mut simulation = Simulation::new(config)?;

    for checkpoint in [1_000, 5_000, 10_000, 11_000, 12_000] {
        let steps = checkpoint - simulation.iteration();
        simulation.run(steps, &mut NoOpRenderer)?;

        let bounding_box = simulation.bounding_box();
        println!(
            "step {:>6}: ant at {}, {} black cells, visited {} x {}",
            simulation.iteration(),
            simulation.ant().position(),
            simulation.black_count(),
            bounding_box.width(),
            bounding_box.height()
        );
    }

    let bounding_box = simulation.bounding_box();
    let pattern = Pattern::capture(
        simulation.grid(),
        bounding_box.min,
        bounding_box.width() as usize,
        bounding_box.height() as usize,
    )?;
    println!("\n{}", pattern);

    simulation.finish()
}
