//! Shared test fixtures: a scripted in-memory engine and config helpers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use feeder_datagen::config::RunConfig;
use feeder_datagen::engine::{Engine, EngineError};

/// Scripted engine: records every directive and serves canned responses.
pub struct MockEngine {
    /// Directives issued through `command`, in order.
    pub commands: Vec<String>,
    /// Query directives issued, in order.
    pub queries: Vec<String>,
    /// Load names returned by the collection accessor.
    pub loads: Vec<String>,
    /// Canned query responses keyed by full directive.
    pub responses: HashMap<String, String>,
    /// Channel data keyed by `(monitor name, channel index)`.
    pub channels: HashMap<(String, usize), Vec<f64>>,
    /// Directive prefix that triggers a rejection, for failure tests.
    pub reject_prefix: Option<String>,
}

impl MockEngine {
    pub fn new(loads: &[&str]) -> Self {
        Self {
            commands: Vec::new(),
            queries: Vec::new(),
            loads: loads.iter().map(|s| s.to_string()).collect(),
            responses: HashMap::new(),
            channels: HashMap::new(),
            reject_prefix: None,
        }
    }

    /// Scripts the `bus1` response for one load.
    pub fn with_bus_spec(mut self, load: &str, bus_spec: &str) -> Self {
        self.responses
            .insert(format!("? load.{load}.bus1"), bus_spec.to_string());
        self
    }

    /// Scripts the readback of one monitor channel.
    pub fn with_channel(mut self, monitor: &str, channel: usize, values: Vec<f64>) -> Self {
        self.channels.insert((monitor.to_string(), channel), values);
        self
    }

    /// Rejects any directive starting with `prefix`.
    pub fn rejecting(mut self, prefix: &str) -> Self {
        self.reject_prefix = Some(prefix.to_string());
        self
    }

    fn check_rejection(&self, directive: &str) -> Result<(), EngineError> {
        if let Some(prefix) = &self.reject_prefix {
            if directive.starts_with(prefix.as_str()) {
                return Err(EngineError {
                    directive: directive.to_string(),
                    message: "rejected by script".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Engine for MockEngine {
    fn command(&mut self, directive: &str) -> Result<(), EngineError> {
        self.commands.push(directive.to_string());
        self.check_rejection(directive)
    }

    fn query(&mut self, directive: &str) -> Result<String, EngineError> {
        self.queries.push(directive.to_string());
        self.check_rejection(directive)?;
        self.responses
            .get(directive)
            .cloned()
            .ok_or_else(|| EngineError {
                directive: directive.to_string(),
                message: "no scripted response".to_string(),
            })
    }

    fn load_names(&mut self) -> Result<Vec<String>, EngineError> {
        Ok(self.loads.clone())
    }

    fn monitor_channel(
        &mut self,
        monitor_name: &str,
        channel: usize,
    ) -> Result<Vec<f64>, EngineError> {
        self.channels
            .get(&(monitor_name.to_string(), channel))
            .cloned()
            .ok_or_else(|| EngineError {
                directive: format!("? monitor.{monitor_name}.channel.{channel}"),
                message: "no scripted channel data".to_string(),
            })
    }
}

/// Three-load engine matching the end-to-end scenario: loads `a`, `b`,
/// `c` on phases 1, 2, 3 with `timestep_count` voltage samples each.
pub fn three_load_engine(timestep_count: usize) -> MockEngine {
    let series = |base: f64| -> Vec<f64> {
        (0..timestep_count).map(|t| base + t as f64 * 0.5).collect()
    };
    MockEngine::new(&["a", "b", "c"])
        .with_bus_spec("a", "b1.1")
        .with_bus_spec("b", "b2.2")
        .with_bus_spec("c", "b3.3")
        .with_channel("a_monitor", 1, series(120.0))
        .with_channel("b_monitor", 1, series(121.0))
        .with_channel("c_monitor", 1, series(122.0))
}

/// Run configuration writing into a unique temp directory.
///
/// Returns `(config, out_dir)`; callers remove the directory when done.
pub fn test_config(tag: &str, seed: u64, steps_per_day: usize, days: usize) -> (RunConfig, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let out_dir = std::env::temp_dir().join(format!(
        "feeder_datagen_{tag}_{}_{nanos}",
        process::id()
    ));

    let mut config = RunConfig::baseline();
    config.run.seed = seed;
    config.run.steps_per_day = steps_per_day;
    config.run.days = days;
    config.output.dir = out_dir.to_string_lossy().into_owned();

    (config, out_dir)
}
