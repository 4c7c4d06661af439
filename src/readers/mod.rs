pub mod csv_reader;
pub mod parquet_reader;
pub mod snapshot_loader;

pub use csv_reader::CsvReader;
pub use parquet_reader::ParquetReader;
pub use snapshot_loader::{SnapshotFormat, SnapshotLoader};
