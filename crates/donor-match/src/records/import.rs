use std::io::Read;
use std::path::Path;

use tracing::info;

use super::donors_from_records;
use super::parser::parse_rows;
use crate::matching::Donor;

#[derive(Debug)]
pub enum DonorImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for DonorImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonorImportError::Io(err) => write!(f, "failed to read donor export: {}", err),
            DonorImportError::Csv(err) => write!(f, "invalid donor CSV data: {}", err),
        }
    }
}

impl std::error::Error for DonorImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DonorImportError::Io(err) => Some(err),
            DonorImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for DonorImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DonorImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads donor roster exports (one donor per CSV row) into engine donors.
pub struct DonorImporter;

impl DonorImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Donor>, DonorImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Donor>, DonorImportError> {
        let rows = parse_rows(reader)?;
        let donors = donors_from_records(rows);
        info!(count = donors.len(), "imported donor roster");
        Ok(donors)
    }
}
