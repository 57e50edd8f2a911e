//! Monitor (probe) creation and readback.

use crate::channel::LoadChannel;
use crate::engine::Engine;
use crate::error::{PipelineError, Step};
use crate::table::Table;

/// A monitor attached to one circuit element terminal.
///
/// Monitors are created on the engine before the solve and read back
/// afterwards; the record itself is never mutated.
#[derive(Debug, Clone)]
pub struct Monitor {
    /// Engine-side monitor object name.
    pub name: String,
    /// Target element name without the object-class prefix.
    pub element_name: String,
    /// Full object name of the monitored element.
    pub object_name: String,
    /// Monitor mode. Mode 0 records terminal voltages and currents.
    pub mode: u8,
    /// Monitored terminal, 1-based.
    pub terminal: u8,
    /// Directive that creates the monitor on the engine.
    pub command: String,
}

/// Makes one monitor per object at the given mode and terminal.
///
/// Output order matches `object_names`. No engine calls happen here; the
/// creation directives are issued later by the pipeline.
pub fn make_monitors(object_names: &[String], mode: u8, terminal: u8) -> Vec<Monitor> {
    object_names
        .iter()
        .map(|object_name| {
            let element_name = object_name
                .rsplit('.')
                .next()
                .unwrap_or(object_name)
                .to_string();
            let name = format!("{element_name}_monitor");
            let command = format!(
                "new Monitor.{name} element={object_name} terminal={terminal} mode={mode}"
            );
            Monitor {
                name,
                element_name,
                object_name: object_name.clone(),
                mode,
                terminal,
                command,
            }
        })
        .collect()
}

/// Reads one channel from every monitor into a timestep-by-element table.
///
/// Column order matches `monitors`, which the pipeline keeps aligned with
/// profile generation order so the Nth column is driven by the Nth
/// injected profile.
///
/// # Errors
///
/// Fails on a rejected readback or when the returned series have unequal
/// lengths.
pub fn read_monitor_data<E: Engine + ?Sized>(
    engine: &mut E,
    channel: LoadChannel,
    monitors: &[Monitor],
) -> Result<Table, PipelineError> {
    let mut columns = Vec::with_capacity(monitors.len());
    let mut series = Vec::with_capacity(monitors.len());

    for monitor in monitors {
        let values = engine
            .monitor_channel(&monitor.name, channel.index())
            .map_err(|e| PipelineError::Engine {
                step: Step::Extract,
                source: e,
            })?;
        columns.push(monitor.element_name.clone());
        series.push(values);
    }

    Table::from_columns(columns, series).map_err(|message| PipelineError::Shape {
        step: Step::Extract,
        message,
    })
}
