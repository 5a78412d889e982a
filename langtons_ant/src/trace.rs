use crate::ant::StepResult;
use crate::error::SimulationError;
use crate::simulation::SimulationConfig;
use serde::Serialize;
use serde_json::json;
use std::{
    fs::File,
    io::{BufWriter, Write},
};

pub fn create_trace_recorder(
    filename: Option<String>,
    config: &SimulationConfig,
) -> Box<dyn TraceRecorder> {
    match filename {
        None => Box::new(NoOpTraceRecorder {}),
        Some(filename) => Box::new(JsonTraceRecorder::new(filename, config.clone())),
    }
}

/// Receives every step of a simulation so it can be replayed later.
pub trait TraceRecorder: Send + Sync {
    #[allow(unused_variables)]
    fn log_step(&mut self, iteration: u64, step: &StepResult) {}

    #[allow(unused_variables)]
    fn log_halt(&mut self, reason: String) {}

    fn clear(&mut self) {}

    fn save(&self) -> Result<(), SimulationError> {
        Ok(())
    }
}

#[derive(Serialize)]
struct TracedStep {
    iteration: u64,
    #[serde(flatten)]
    step: StepResult,
}

struct NoOpTraceRecorder;
impl TraceRecorder for NoOpTraceRecorder {}

struct JsonTraceRecorder {
    filename: String,
    config: SimulationConfig,
    steps: Vec<TracedStep>,
    halt_reason: Option<String>,
}

impl JsonTraceRecorder {
    pub fn new(filename: String, config: SimulationConfig) -> JsonTraceRecorder {
        JsonTraceRecorder {
            filename,
            config,
            steps: Vec::new(),
            halt_reason: None,
        }
    }
}

impl TraceRecorder for JsonTraceRecorder {
    fn log_step(&mut self, iteration: u64, step: &StepResult) {
        self.steps.push(TracedStep {
            iteration,
            step: *step,
        });
    }

    fn log_halt(&mut self, reason: String) {
        self.halt_reason = Some(reason);
    }

    fn clear(&mut self) {
        self.steps.clear();
        self.halt_reason = None;
    }

    fn save(&self) -> Result<(), SimulationError> {
        let file = File::create(&self.filename)?;
        let data = json!({
            "config": self.config,
            "steps": self.steps,
            "halt_reason": self.halt_reason,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ant::Heading;
    use crate::grid::{Color, Coordinate};
    use crate::simulation::Simulation;
    use serde_json::Value;
    use std::fs;
    use std::path::PathBuf;

    fn trace_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("langtons_ant_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn when_saving_a_json_trace_every_step_is_written() {
        let path = trace_path("steps");
        let config = SimulationConfig::unbounded().with_trace_file(path.to_str().unwrap());
        let mut simulation = Simulation::new(config).unwrap();

        for _ in 0..3 {
            simulation.step().unwrap();
        }
        simulation.finish().unwrap();

        let trace: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        let steps = trace["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["iteration"], 1);
        assert_eq!(steps[0]["old_position"], json!({ "x": 0, "y": 0 }));
        assert_eq!(steps[0]["new_position"], json!({ "x": 1, "y": 0 }));
        assert_eq!(steps[0]["color_after"], "Black");
        assert_eq!(steps[2]["new_heading"], "West");
        assert_eq!(trace["halt_reason"], Value::Null);
        assert_eq!(trace["config"]["start_heading"], "North");
    }

    #[test]
    fn when_the_simulation_halts_the_trace_is_saved_with_the_reason() {
        let path = trace_path("halt");
        let config = SimulationConfig::bounded(1, 1).with_trace_file(path.to_str().unwrap());
        let mut simulation = Simulation::new(config).unwrap();

        assert!(simulation.step().is_err());

        let trace: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(trace["steps"].as_array().unwrap().len(), 0);
        assert!(trace["halt_reason"].as_str().unwrap().contains("1 x 1"));
    }

    #[test]
    fn when_clearing_a_recorder_previous_steps_are_dropped() {
        let path = trace_path("clear");
        let mut recorder = JsonTraceRecorder::new(
            path.to_str().unwrap().to_string(),
            SimulationConfig::unbounded(),
        );
        let step = StepResult {
            old_position: Coordinate::new(0, 0),
            new_position: Coordinate::new(1, 0),
            color_before: Color::White,
            color_after: Color::Black,
            new_heading: Heading::East,
        };

        recorder.log_step(1, &step);
        recorder.log_halt("stopped".to_string());
        recorder.clear();

        assert!(recorder.steps.is_empty());
        assert!(recorder.halt_reason.is_none());
    }

    #[test]
    fn when_saving_a_trace_to_an_unwritable_path_an_error_is_returned() {
        let recorder = JsonTraceRecorder::new(
            "/nonexistent/dir/trace.json".to_string(),
            SimulationConfig::unbounded(),
        );

        assert!(matches!(recorder.save(), Err(SimulationError::Io(_))));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn when_the_buffered_trace_cannot_be_flushed_an_error_is_returned() {
        // Opening /dev/full succeeds, every write to it fails with ENOSPC
        let recorder =
            JsonTraceRecorder::new("/dev/full".to_string(), SimulationConfig::unbounded());

        assert!(matches!(recorder.save(), Err(SimulationError::Io(_))));
    }
}
