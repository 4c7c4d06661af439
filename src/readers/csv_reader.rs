use crate::error::Result;
use crate::models::{Measurement, Station};
use memmap2::Mmap;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Reads the `measurement.csv` / `station.csv` snapshot relations.
///
/// Columns are matched by header name, so extra columns such as a leading
/// `id` are ignored. Every row is validated; one bad row fails the read.
pub struct CsvReader {
    use_mmap: bool,
}

impl CsvReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    pub fn read_measurements(&self, path: &Path) -> Result<Vec<Measurement>> {
        self.read_file(path)
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        self.read_file(path)
    }

    fn read_file<T: DeserializeOwned + Validate>(&self, path: &Path) -> Result<Vec<T>> {
        let file = File::open(path)?;
        let records = if self.use_mmap {
            // SAFETY: the snapshot is read-only for the life of the process
            let mmap = unsafe { Mmap::map(&file)? };
            Self::read_records(&mmap[..])?
        } else {
            Self::read_records(BufReader::new(file))?
        };

        debug!("Read {} rows from {}", records.len(), path.display());
        Ok(records)
    }

    fn read_records<T: DeserializeOwned + Validate, R: Read>(source: R) -> Result<Vec<T>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: T = row?;
            record.validate()?;
            records.push(record);
        }

        Ok(records)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}
