//! The dataset-generation run sequence.
//!
//! Seven strictly sequential steps against a single engine session. The
//! session is stateful: the circuit load, monitor creation, profile
//! injection, and run-mode directives each mutate engine state that later
//! steps depend on, so nothing here may be reordered or retried. Any
//! failure aborts the run and invalidates whatever artifacts were already
//! written.

use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::channel::LoadChannel;
use crate::config::RunConfig;
use crate::engine::Engine;
use crate::error::{PipelineError, Step};
use crate::io::export::{export_metadata_csv, export_table_csv};
use crate::metadata::make_metadata;
use crate::monitor::{Monitor, make_monitors, read_monitor_data};
use crate::profile::{Profile, make_uniform_profiles};
use crate::table::Table;

/// Mode 0 records terminal voltages and currents.
const MONITOR_MODE: u8 = 0;
/// Loads are monitored at their only terminal.
const MONITOR_TERMINAL: u8 = 1;
/// Channel persisted to the voltage artifact.
const CHANNEL: LoadChannel = LoadChannel::Mode0V1;

/// Runs the full pipeline against `engine` and writes the three artifacts.
///
/// The load-object list built during instrumentation is reused verbatim
/// for profile synthesis, so the Nth profile, the Nth monitor, and the
/// Nth column of both value artifacts all refer to the same element. The
/// injected-profile table is dropped as soon as it is persisted, before
/// the solve, to bound peak memory.
///
/// # Errors
///
/// Any rejected directive, malformed query response, shape mismatch, or
/// artifact write failure aborts the run with the failing step attached.
pub fn run<E: Engine + ?Sized>(engine: &mut E, config: &RunConfig) -> Result<(), PipelineError> {
    let timestep_count = config.timestep_count();

    // 1. Load: reset the engine and read the circuit definition.
    println!("Loading circuit...");
    dispatch(engine, Step::Load, "clearall")?;
    dispatch(
        engine,
        Step::Load,
        &format!("redirect ({})", config.run.circuit_path),
    )?;

    // 2. Instrument: one mode-0 monitor on every load's first terminal.
    let load_names = engine.load_names().map_err(|e| PipelineError::Engine {
        step: Step::Instrument,
        source: e,
    })?;
    let object_names: Vec<String> = load_names.iter().map(|name| format!("Load.{name}")).collect();

    let monitors = make_monitors(&object_names, MONITOR_MODE, MONITOR_TERMINAL);
    for monitor in &monitors {
        dispatch(engine, Step::Instrument, &monitor.command)?;
    }

    // 3. Synthesize: seeded uniform profiles over the same object list,
    // injected in generation order.
    println!("Making synthetic profiles...");
    let mut rng = StdRng::seed_from_u64(config.run.seed);
    let profiles = make_uniform_profiles(&object_names, &mut rng, timestep_count);
    check_profile_shapes(&profiles, object_names.len(), timestep_count)?;

    for profile in &profiles {
        for command in &profile.commands {
            dispatch(engine, Step::Synthesize, command)?;
        }
    }

    // 4. Persist the injected profiles, then release them; the value
    // table is large and the solve is about to be too.
    println!("Saving synthetic profiles...");
    fs::create_dir_all(&config.output.dir).map_err(|e| PipelineError::Persist {
        path: PathBuf::from(&config.output.dir),
        source: e,
    })?;

    let profile_table = profile_table(profiles)?;
    persist_table(&profile_table, config.output.profile_path())?;
    drop(profile_table);

    // 5. Simulate: yearly mode advances one timestep per solve iteration,
    // applying each load's bound shape value.
    println!("Running simulation...");
    dispatch(
        engine,
        Step::Simulate,
        &format!("set mode=yearly number={timestep_count}"),
    )?;
    dispatch(engine, Step::Simulate, "solve")?;

    // 6. Extract: monitor readback, then metadata.
    let voltage_table = read_monitor_data(engine, CHANNEL, &monitors)?;
    check_measurement_shape(&voltage_table, &monitors, timestep_count)?;

    println!("Making metadata...");
    let metadata = make_metadata(engine)?;

    // 7. Persist the measured voltages and the metadata.
    println!("Saving data...");
    persist_table(&voltage_table, config.output.voltage_path())?;
    export_metadata_csv(&metadata, &config.output.metadata_path()).map_err(|e| {
        PipelineError::Persist {
            path: config.output.metadata_path(),
            source: e,
        }
    })?;

    println!("...Done!");
    Ok(())
}

fn dispatch<E: Engine + ?Sized>(
    engine: &mut E,
    step: Step,
    directive: &str,
) -> Result<(), PipelineError> {
    engine
        .command(directive)
        .map_err(|source| PipelineError::Engine { step, source })
}

fn check_profile_shapes(
    profiles: &[Profile],
    element_count: usize,
    timestep_count: usize,
) -> Result<(), PipelineError> {
    if profiles.len() != element_count {
        return Err(PipelineError::Shape {
            step: Step::Synthesize,
            message: format!("{} profiles for {element_count} elements", profiles.len()),
        });
    }
    if let Some(bad) = profiles.iter().find(|p| p.values.len() != timestep_count) {
        return Err(PipelineError::Shape {
            step: Step::Synthesize,
            message: format!(
                "profile \"{}\" has {} values, expected {timestep_count}",
                bad.element_name,
                bad.values.len()
            ),
        });
    }
    Ok(())
}

/// Assembles the injected profiles into a timestep-by-element table,
/// consuming the profiles so their values are moved rather than copied.
fn profile_table(profiles: Vec<Profile>) -> Result<Table, PipelineError> {
    let mut columns = Vec::with_capacity(profiles.len());
    let mut series = Vec::with_capacity(profiles.len());
    for profile in profiles {
        columns.push(profile.element_name);
        series.push(profile.values);
    }

    Table::from_columns(columns, series).map_err(|message| PipelineError::Shape {
        step: Step::Synthesize,
        message,
    })
}

fn check_measurement_shape(
    table: &Table,
    monitors: &[Monitor],
    timestep_count: usize,
) -> Result<(), PipelineError> {
    if table.n_cols() != monitors.len() {
        return Err(PipelineError::Shape {
            step: Step::Extract,
            message: format!(
                "{} measurement columns for {} monitors",
                table.n_cols(),
                monitors.len()
            ),
        });
    }
    if table.n_rows() != timestep_count {
        return Err(PipelineError::Shape {
            step: Step::Extract,
            message: format!(
                "{} measurement rows for {timestep_count} timesteps",
                table.n_rows()
            ),
        });
    }
    Ok(())
}

fn persist_table(table: &Table, path: PathBuf) -> Result<(), PipelineError> {
    export_table_csv(table, &path).map_err(|source| PipelineError::Persist { path, source })
}
