//! Presentation snapshot of the managed-object state.
//!
//! Consumes the apartment through plain accessors only; formatting and
//! export stay outside the core model.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::Apartment;

/// Column header for the flat-table CSV export.
const FLATS_CSV_HEADER: &str = "flat_id,consumption,heating_cooling,lighting,misc";

const UNSET: &str = "<unset>";

/// An owned snapshot of all apartment scalars and the ordered flat table.
#[derive(Debug, Clone)]
pub struct StateReport {
    /// Apartment device id.
    pub device_id: String,
    /// Total energy consumption.
    pub consumption: String,
    /// Total energy generation as of the last recompute.
    pub generation: String,
    /// Energy storage usage.
    pub storage: String,
    /// Energy generation by solar.
    pub generation_by_solar: String,
    /// Energy generation by hydro.
    pub generation_by_hydro: String,
    /// Flat table rows in insertion order, five cells each.
    pub flats: Vec<Vec<String>>,
}

impl StateReport {
    /// Captures the current state of an apartment.
    ///
    /// Uninitialised scalars render as `<unset>` rather than failing; a
    /// report is diagnostic output, not a contract check.
    pub fn from_apartment(apartment: &Apartment) -> Self {
        let scalar = |value: Option<&str>| value.unwrap_or(UNSET).to_string();
        Self {
            device_id: scalar(apartment.device_id()),
            consumption: scalar(apartment.consumption()),
            generation: scalar(apartment.generation()),
            storage: scalar(apartment.storage()),
            generation_by_solar: scalar(apartment.generation_by_solar()),
            generation_by_hydro: scalar(apartment.generation_by_hydro()),
            flats: apartment.flat_rows(),
        }
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== STATE OF MANAGED OBJECTS ===")?;
        writeln!(f)?;
        writeln!(f, "Apartment id: {}", self.device_id)?;
        writeln!(f, "Apartment energy consumption: {}", self.consumption)?;
        writeln!(f, "Apartment energy generation: {}", self.generation)?;
        writeln!(f, "  storage: {}", self.storage)?;
        writeln!(f, "  generation by solar: {}", self.generation_by_solar)?;
        writeln!(f, "  generation by hydro: {}", self.generation_by_hydro)?;
        for row in &self.flats {
            writeln!(f)?;
            writeln!(f, "Flat id: {}", row[0])?;
            writeln!(f, "Flat energy consumption: {}", row[1])?;
            writeln!(f, "  by heating and cooling: {}", row[2])?;
            writeln!(f, "  by lighting: {}", row[3])?;
            writeln!(f, "  by miscellaneous: {}", row[4])?;
        }
        Ok(())
    }
}

/// Writes the flat table as CSV to any writer.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_flats_csv(report: &StateReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(FLATS_CSV_HEADER.split(','))?;
    for row in &report.flats {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the flat table as CSV to the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_flats_csv(report: &StateReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_flats_csv(report, buf)
}
