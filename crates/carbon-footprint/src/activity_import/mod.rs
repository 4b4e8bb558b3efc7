//! Bulk activity import from spreadsheet exports.
//!
//! One row per activity with the columns `category, source, amount, unit, type, vehicle,
//! eco_labeled, calorific_value_mj, density_kg_l, gwp_factor` and, for fuels, the optional
//! per-gas overrides `emission_factor_co2_kg_gj`, `emission_factor_ch4_kg_gj` and
//! `emission_factor_n2o_kg_gj`. Only `category` and `amount` are always required; `type`
//! names the fuel, refrigerant, flight class or road vehicle.

mod parser;

use crate::emissions::{ActivityRecord, EmissionError, FootprintInputs};
use std::io::Read;
use std::path::Path;

pub use parser::RowError;

#[derive(Debug)]
pub enum ActivityImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, reason: RowError },
    Grouping(EmissionError),
}

impl std::fmt::Display for ActivityImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityImportError::Io(err) => write!(f, "failed to read activity sheet: {}", err),
            ActivityImportError::Csv(err) => write!(f, "invalid activity CSV data: {}", err),
            ActivityImportError::Row { line, reason } => {
                write!(f, "activity sheet line {}: {}", line, reason)
            }
            ActivityImportError::Grouping(err) => {
                write!(f, "could not group imported activities: {}", err)
            }
        }
    }
}

impl std::error::Error for ActivityImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActivityImportError::Io(err) => Some(err),
            ActivityImportError::Csv(err) => Some(err),
            ActivityImportError::Row { reason, .. } => Some(reason),
            ActivityImportError::Grouping(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ActivityImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ActivityImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<EmissionError> for ActivityImportError {
    fn from(err: EmissionError) -> Self {
        Self::Grouping(err)
    }
}

pub struct ActivityImporter;

impl ActivityImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ActivityRecord>, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses every row; the first malformed row aborts the import with its line number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ActivityRecord>, ActivityImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .map(|row| {
                row.outcome.map_err(|reason| ActivityImportError::Row {
                    line: row.line,
                    reason,
                })
            })
            .collect()
    }

    pub fn inputs_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<FootprintInputs, ActivityImportError> {
        let records = Self::from_path(path)?;
        Ok(FootprintInputs::from_records(records)?)
    }

    pub fn inputs_from_reader<R: Read>(reader: R) -> Result<FootprintInputs, ActivityImportError> {
        let records = Self::from_reader(reader)?;
        Ok(FootprintInputs::from_records(records)?)
    }
}
