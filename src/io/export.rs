//! CSV persistence for run artifacts.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::metadata::LoadMetadata;
use crate::table::Table;

/// Writes a value table as CSV to the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_table_csv(table: &Table, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_table_csv(table, BufWriter::new(file))
}

/// Writes a value table as CSV to any writer: a header row of column
/// names, then one row per timestep.
///
/// Values use `f64`'s shortest round-trip form, so re-parsing the file
/// reproduces the exact bits. Output is deterministic for identical
/// inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_table_csv(table: &Table, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(f64::to_string))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes metadata records as CSV to the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_metadata_csv(records: &[LoadMetadata], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_metadata_csv(records, BufWriter::new(file))
}

/// Writes metadata records as CSV with `load_name,phase` columns, one row
/// per load in record order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_metadata_csv(records: &[LoadMetadata], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(["load_name", "phase"])?;
    for record in records {
        wtr.write_record([record.load_name.clone(), record.phase.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
