//! Timestep-by-element value tables.

/// A value table with one named column per element and one row per
/// timestep.
///
/// Used both for the injected profiles and for the monitor readback, so
/// the two artifacts share column order and encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    /// Builds a table from equal-length columns, preserving column order.
    ///
    /// # Errors
    ///
    /// Returns a description of the first shape mismatch: a name/series
    /// count disagreement or a column whose length differs from the first.
    pub fn from_columns(columns: Vec<String>, series: Vec<Vec<f64>>) -> Result<Self, String> {
        if columns.len() != series.len() {
            return Err(format!(
                "{} column names for {} value series",
                columns.len(),
                series.len()
            ));
        }

        let expected = series.first().map_or(0, Vec::len);
        for (name, values) in columns.iter().zip(&series) {
            if values.len() != expected {
                return Err(format!(
                    "column \"{name}\" has {} values, expected {expected}",
                    values.len()
                ));
            }
        }

        let rows = (0..expected)
            .map(|t| series.iter().map(|values| values[t]).collect())
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column names in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in timestep order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of timesteps.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of element columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}
