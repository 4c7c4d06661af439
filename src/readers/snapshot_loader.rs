use crate::error::{QueryError, Result};
use crate::readers::{CsvReader, ParquetReader};
use crate::store::Dataset;
use crate::utils::constants::{
    MEASUREMENT_CSV_FILE, MEASUREMENT_PARQUET_FILE, STATION_CSV_FILE, STATION_PARQUET_FILE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    Csv,
    Parquet,
    /// Parquet when `measurement.parquet` exists, CSV otherwise
    #[default]
    Auto,
}

impl SnapshotFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "csv",
            SnapshotFormat::Parquet => "parquet",
            SnapshotFormat::Auto => "auto",
        }
    }
}

/// Loads both snapshot relations from a data directory into a [`Dataset`].
pub struct SnapshotLoader {
    data_dir: PathBuf,
    format: SnapshotFormat,
    use_mmap: bool,
}

impl SnapshotLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            format: SnapshotFormat::Auto,
            use_mmap: false,
        }
    }

    pub fn with_format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Concrete format for this directory, resolving `Auto`.
    pub fn resolve_format(&self) -> SnapshotFormat {
        match self.format {
            SnapshotFormat::Auto if self.data_dir.join(MEASUREMENT_PARQUET_FILE).exists() => {
                SnapshotFormat::Parquet
            }
            SnapshotFormat::Auto => SnapshotFormat::Csv,
            format => format,
        }
    }

    /// Read measurements and stations concurrently on the blocking pool.
    pub async fn load(&self) -> Result<Dataset> {
        let format = self.resolve_format();
        let (measurement_path, station_path) = self.snapshot_paths(format)?;
        let use_mmap = self.use_mmap;

        info!(
            "Loading {} snapshot from {}",
            format.as_str(),
            self.data_dir.display()
        );

        let measurements_handle = tokio::task::spawn_blocking(move || match format {
            SnapshotFormat::Parquet => ParquetReader::new().read_measurements(&measurement_path),
            _ => CsvReader::with_mmap(use_mmap).read_measurements(&measurement_path),
        });

        let stations_handle = tokio::task::spawn_blocking(move || match format {
            SnapshotFormat::Parquet => ParquetReader::new().read_stations(&station_path),
            _ => CsvReader::with_mmap(use_mmap).read_stations(&station_path),
        });

        let (measurements, stations) = tokio::try_join!(measurements_handle, stations_handle)?;
        let dataset = Dataset::new(measurements?, stations?);

        info!(
            "Loaded {} measurements and {} stations",
            dataset.measurement_count(),
            dataset.station_count()
        );

        Ok(dataset)
    }

    fn snapshot_paths(&self, format: SnapshotFormat) -> Result<(PathBuf, PathBuf)> {
        let (measurement_file, station_file) = match format {
            SnapshotFormat::Parquet => (MEASUREMENT_PARQUET_FILE, STATION_PARQUET_FILE),
            _ => (MEASUREMENT_CSV_FILE, STATION_CSV_FILE),
        };

        let measurement_path = self.data_dir.join(measurement_file);
        let station_path = self.data_dir.join(station_file);

        for path in [&measurement_path, &station_path] {
            require_file(path)?;
        }

        Ok((measurement_path, station_path))
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        debug!("Found snapshot file {}", path.display());
        Ok(())
    } else {
        Err(QueryError::MissingData(format!(
            "snapshot file not found: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv_snapshot(dir: &Path) -> Result<()> {
        fs::write(
            dir.join(MEASUREMENT_CSV_FILE),
            "station,date,prcp,tobs\n\
             S1,2017-08-22,0.0,77\n\
             S1,2017-08-23,0.02,78\n\
             S2,2017-08-23,,80\n",
        )?;
        fs::write(
            dir.join(STATION_CSV_FILE),
            "station,name,latitude,longitude,elevation\n\
             S1,First,21.27,-157.82,3.0\n\
             S2,Second,21.42,-157.80,14.6\n",
        )?;
        Ok(())
    }

    #[tokio::test]
    async fn test_load_csv_snapshot() -> Result<()> {
        let temp_dir = TempDir::new()?;
        write_csv_snapshot(temp_dir.path())?;

        let loader = SnapshotLoader::new(temp_dir.path());
        assert_eq!(loader.resolve_format(), SnapshotFormat::Csv);

        let dataset = loader.load().await?;
        assert_eq!(dataset.measurement_count(), 3);
        assert_eq!(dataset.station_count(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_snapshot_file() -> Result<()> {
        let temp_dir = TempDir::new()?;

        let result = SnapshotLoader::new(temp_dir.path()).load().await;
        assert!(matches!(result, Err(QueryError::MissingData(_))));

        Ok(())
    }

    #[test]
    fn test_explicit_format_is_kept() {
        let loader = SnapshotLoader::new("does-not-exist").with_format(SnapshotFormat::Parquet);
        assert_eq!(loader.resolve_format(), SnapshotFormat::Parquet);
    }
}
