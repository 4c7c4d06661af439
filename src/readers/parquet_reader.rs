use crate::error::{QueryError, Result};
use crate::models::{Measurement, Station};
use crate::utils::constants::{DEFAULT_BATCH_SIZE, UNIX_EPOCH_DAYS_FROM_CE};
use arrow::array::{Array, Date32Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use validator::Validate;

/// Reads the `measurement.parquet` / `station.parquet` snapshot relations
/// written by [`crate::writers::ParquetWriter`]. Columns are looked up by name.
pub struct ParquetReader {
    batch_size: usize,
}

impl ParquetReader {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn read_measurements(&self, path: &Path) -> Result<Vec<Measurement>> {
        let mut records = Vec::new();

        for batch in self.read_batches(path)? {
            let stations = string_column(&batch, "station")?;
            let dates = column::<Date32Array>(&batch, "date")?;
            let prcps = column::<Float64Array>(&batch, "prcp")?;
            let tobs = column::<Float64Array>(&batch, "tobs")?;

            for i in 0..batch.num_rows() {
                let precipitation = if prcps.is_null(i) {
                    None
                } else {
                    Some(prcps.value(i))
                };

                let record = Measurement::new(
                    stations.value(i),
                    date_from_days(dates.value(i))?,
                    precipitation,
                    tobs.value(i),
                );
                record.validate()?;
                records.push(record);
            }
        }

        Ok(records)
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let mut records = Vec::new();

        for batch in self.read_batches(path)? {
            let ids = string_column(&batch, "station")?;
            let names = string_column(&batch, "name")?;
            let latitudes = column::<Float64Array>(&batch, "latitude")?;
            let longitudes = column::<Float64Array>(&batch, "longitude")?;
            let elevations = column::<Float64Array>(&batch, "elevation")?;

            for i in 0..batch.num_rows() {
                let station = Station::new(
                    ids.value(i),
                    names.value(i),
                    latitudes.value(i),
                    longitudes.value(i),
                    elevations.value(i),
                );
                station.validate()?;
                records.push(station);
            }
        }

        Ok(records)
    }

    fn read_batches(&self, path: &Path) -> Result<Vec<RecordBatch>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(self.batch_size)
            .build()?;

        let mut batches = Vec::new();
        for batch in reader {
            batches.push(batch?);
        }
        Ok(batches)
    }
}

impl Default for ParquetReader {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| QueryError::MissingData(format!("Parquet column '{}' not found", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| QueryError::InvalidFormat(format!("Invalid {} column type", name)))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    column::<StringArray>(batch, name)
}

fn date_from_days(days_since_epoch: i32) -> Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days_since_epoch + UNIX_EPOCH_DAYS_FROM_CE).ok_or_else(
        || QueryError::InvalidFormat(format!("Invalid date in Parquet file: {}", days_since_epoch)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_days() {
        assert_eq!(
            date_from_days(0).unwrap(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
        assert_eq!(
            date_from_days(17_401).unwrap(),
            NaiveDate::from_ymd_opt(2017, 8, 23).unwrap()
        );
    }

    #[test]
    fn test_non_finite_temperature_fails() -> Result<()> {
        let temp_file = tempfile::NamedTempFile::new()?;
        let date = NaiveDate::from_ymd_opt(2017, 8, 23).unwrap();
        let records = vec![
            Measurement::new("S1", date, Some(0.02), 77.0),
            Measurement::new("S1", date, None, f64::NAN),
        ];

        crate::writers::ParquetWriter::new().write_measurements(&records, temp_file.path())?;
        let result = ParquetReader::new().read_measurements(temp_file.path());

        assert!(matches!(result, Err(QueryError::Validation(_))));
        Ok(())
    }
}
