use crate::error::Result;
use crate::models::{Measurement, Station};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE, UNIX_EPOCH_DAYS_FROM_CE,
};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Column compression for exported snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Gzip,
    Lz4,
    Zstd,
    None,
}

impl ParquetCompression {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParquetCompression::Snappy => COMPRESSION_SNAPPY,
            ParquetCompression::Gzip => COMPRESSION_GZIP,
            ParquetCompression::Lz4 => COMPRESSION_LZ4,
            ParquetCompression::Zstd => COMPRESSION_ZSTD,
            ParquetCompression::None => COMPRESSION_NONE,
        }
    }

    fn codec(&self) -> Compression {
        match self {
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
            ParquetCompression::Lz4 => Compression::LZ4,
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            ParquetCompression::None => Compression::UNCOMPRESSED,
        }
    }
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: ParquetCompression::default().codec(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: ParquetCompression) -> Self {
        self.compression = compression.codec();
        self
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write measurements as `station`, `date`, `prcp` (nullable), `tobs`.
    pub fn write_measurements(&self, records: &[Measurement], path: &Path) -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("station", DataType::Utf8, false),
            Field::new("date", DataType::Date32, false),
            Field::new("prcp", DataType::Float64, true),
            Field::new("tobs", DataType::Float64, false),
        ]));

        let stations: Vec<&str> = records.iter().map(|r| r.station_id.as_str()).collect();
        let dates: Vec<i32> = records
            .iter()
            .map(|r| r.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let prcps: Vec<Option<f64>> = records.iter().map(|r| r.precipitation).collect();
        let tobs: Vec<f64> = records.iter().map(|r| r.temperature_observation).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(stations)),
            Arc::new(Date32Array::from(dates)),
            Arc::new(Float64Array::from(prcps)),
            Arc::new(Float64Array::from(tobs)),
        ];

        self.write_batch(RecordBatch::try_new(schema.clone(), columns)?, schema, path)
    }

    pub fn write_stations(&self, records: &[Station], path: &Path) -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("station", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("elevation", DataType::Float64, false),
        ]));

        let ids: Vec<&str> = records.iter().map(|r| r.station_id.as_str()).collect();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let latitudes: Vec<f64> = records.iter().map(|r| r.latitude).collect();
        let longitudes: Vec<f64> = records.iter().map(|r| r.longitude).collect();
        let elevations: Vec<f64> = records.iter().map(|r| r.elevation).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(names)),
            Arc::new(Float64Array::from(latitudes)),
            Arc::new(Float64Array::from(longitudes)),
            Arc::new(Float64Array::from(elevations)),
        ];

        self.write_batch(RecordBatch::try_new(schema.clone(), columns)?, schema, path)
    }

    fn write_batch(&self, batch: RecordBatch, schema: Arc<Schema>, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}
