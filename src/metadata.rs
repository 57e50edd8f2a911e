//! Per-load metadata extraction.

use crate::engine::{Engine, query_bus_spec};
use crate::error::{PipelineError, Step};

/// Static metadata for one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMetadata {
    /// Load name as enumerated by the engine.
    pub load_name: String,
    /// Zero-based phase label: A = 0, B = 1, C = 2.
    ///
    /// Derived from the load's first-terminal bus specifier, which names
    /// the connected phase with a 1-based index for single-terminal
    /// Y-connected loads. Multi-phase and delta connections have no
    /// defined encoding here and fail extraction instead.
    pub phase: u8,
}

/// Makes one metadata record per load in the active circuit.
///
/// Records follow the engine's load enumeration order, which is not
/// sorted and is preserved as the metadata row order. Every load gets a
/// record whether or not a profile or monitor exists for it.
///
/// # Errors
///
/// Fails on a rejected query or a bus specifier that does not carry a
/// numeric 1-based phase field. A malformed specifier aborts the whole
/// extraction; there is no per-load default.
pub fn make_metadata<E: Engine + ?Sized>(engine: &mut E) -> Result<Vec<LoadMetadata>, PipelineError> {
    let load_names = engine.load_names().map_err(|e| PipelineError::Engine {
        step: Step::Extract,
        source: e,
    })?;

    let mut records = Vec::with_capacity(load_names.len());
    for load_name in load_names {
        let bus_spec = query_bus_spec(engine, &load_name).map_err(|e| PipelineError::Engine {
            step: Step::Extract,
            source: e,
        })?;
        let phase = parse_phase(&load_name, &bus_spec)?;
        records.push(LoadMetadata { load_name, phase });
    }

    Ok(records)
}

/// Derives the zero-based phase from a dot-separated bus specifier.
///
/// The engine reports a Y-connected load's bus as `{bus}.{phase}` with
/// phase A = 1, B = 2, C = 3.
fn parse_phase(load_name: &str, bus_spec: &str) -> Result<u8, PipelineError> {
    let parse_error = |message: String| PipelineError::Parse {
        load_name: load_name.to_string(),
        response: bus_spec.to_string(),
        message,
    };

    let field = bus_spec
        .split('.')
        .nth(1)
        .ok_or_else(|| parse_error("expected at least 2 dot-separated fields".to_string()))?;

    let index: u8 = field
        .parse()
        .map_err(|_| parse_error(format!("phase field \"{field}\" is not an integer")))?;

    index
        .checked_sub(1)
        .ok_or_else(|| parse_error("phase index is 1-based, got 0".to_string()))
}
