/// Snapshot file names
pub const MEASUREMENT_CSV_FILE: &str = "measurement.csv";
pub const STATION_CSV_FILE: &str = "station.csv";
pub const MEASUREMENT_PARQUET_FILE: &str = "measurement.parquet";
pub const STATION_PARQUET_FILE: &str = "station.parquet";

/// Configuration defaults
pub const DEFAULT_CONFIG_FILE: &str = "climate-query.toml";
pub const DEFAULT_DATA_DIR: &str = "Resources";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const ENV_PREFIX: &str = "CLIMATE";

/// Query defaults
pub const DEFAULT_WINDOW_DAYS: u32 = 365;
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BATCH_SIZE: usize = 8192;
/// Degrees between consecutive readings before the integrity report flags a jump
pub const DEFAULT_JUMP_THRESHOLD: f64 = 30.0;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch, for Arrow Date32
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// API routes
pub const ROUTE_PRECIPITATION: &str = "/api/v1.0/precipitation";
pub const ROUTE_STATIONS: &str = "/api/v1.0/stations";
pub const ROUTE_TOBS: &str = "/api/v1.0/tobs";
pub const ROUTE_STATS_FROM: &str = "/api/v1.0/:start";
pub const ROUTE_STATS_BETWEEN: &str = "/api/v1.0/:start/:end";
