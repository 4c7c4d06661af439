use crate::readers::SnapshotFormat;
use crate::utils::constants::DEFAULT_JUMP_THRESHOLD;
use crate::writers::ParquetCompression;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-query")]
#[command(about = "Read-only climate queries over a historical station dataset")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file [default: climate-query.toml]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Directory holding the dataset snapshot")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum, help = "Snapshot format")]
    pub format: Option<SnapshotFormat>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the query API over HTTP
    Serve {
        #[arg(long, help = "Bind address")]
        host: Option<String>,

        #[arg(short, long, help = "Bind port")]
        port: Option<u16>,
    },

    /// Run a single query and print the JSON result
    Query {
        #[command(subcommand)]
        query: QueryCommand,
    },

    /// Load the snapshot and report integrity findings
    Validate {
        #[arg(
            long,
            default_value_t = DEFAULT_JUMP_THRESHOLD,
            help = "Flag consecutive readings further apart than this (degrees)"
        )]
        jump_threshold: f64,
    },

    /// Write the loaded snapshot as Parquet files
    Export {
        #[arg(short, long, help = "Output directory for measurement.parquet and station.parquet")]
        output_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = ParquetCompression::Snappy)]
        compression: ParquetCompression,
    },
}

#[derive(Subcommand)]
pub enum QueryCommand {
    /// Precipitation for every measurement, oldest first
    Precipitation,

    /// Station ids from the station roster
    Stations,

    /// Most active station's temperatures over the trailing year
    Tobs,

    /// Observation count per station, most active first
    Activity {
        #[arg(short, long, default_value = "10", help = "Stations to show (0 = all)")]
        limit: usize,
    },

    /// Min/avg/max temperature from START (to END when given)
    Stats {
        #[arg(help = "Start date, YYYY-MM-DD")]
        start: String,

        #[arg(help = "End date, YYYY-MM-DD")]
        end: Option<String>,
    },
}
