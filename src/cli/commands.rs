use crate::analyzers::ClimateAnalyzer;
use crate::cli::args::{Cli, Commands, QueryCommand};
use crate::config::{Settings, SettingsOverrides};
use crate::error::Result;
use crate::processors::IntegrityChecker;
use crate::readers::SnapshotLoader;
use crate::server::{self, AppState};
use crate::store::{Dataset, RecordStore};
use crate::utils::constants::{MEASUREMENT_PARQUET_FILE, STATION_PARQUET_FILE};
use crate::utils::dates::parse_date_range;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    let overrides = SettingsOverrides {
        data_dir: cli.data_dir.clone(),
        format: cli.format,
        host,
        port,
        verbose: cli.verbose,
    };

    let settings = Settings::load(cli.config.as_deref(), &overrides)?;
    init_logging(&settings.logging.level, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Serve { .. } => {
            let addr = settings.server.socket_addr()?;
            let dataset = load_dataset(&settings, false).await?;

            let state = AppState::new(Arc::new(dataset))
                .with_window_days(settings.query.window_days);
            server::serve(state, addr).await?;
        }

        Commands::Query { query } => {
            // Reject bad dates before loading anything
            let range = match &query {
                QueryCommand::Stats { start, end } => Some(parse_date_range(start, end.as_deref())?),
                _ => None,
            };

            let dataset = load_dataset(&settings, true).await?;
            let analyzer =
                ClimateAnalyzer::new(&dataset).with_window_days(settings.query.window_days);

            match query {
                QueryCommand::Precipitation => print_json(&analyzer.precipitation_series())?,
                QueryCommand::Stations => print_json(&analyzer.station_roster())?,
                QueryCommand::Tobs => print_json(&analyzer.recent_year_temperatures()?)?,
                QueryCommand::Activity { limit } => {
                    let mut activity = analyzer.station_activity();
                    if limit > 0 {
                        activity.truncate(limit);
                    }
                    print_json(&activity)?
                }
                QueryCommand::Stats { .. } => {
                    if let Some((start, end)) = range {
                        let stats: Vec<_> =
                            analyzer.temperature_stats(start, end).into_iter().collect();
                        print_json(&stats)?
                    }
                }
            }
        }

        Commands::Validate { jump_threshold } => {
            let dataset = load_dataset(&settings, false).await?;

            let checker = IntegrityChecker::new().with_jump_threshold(jump_threshold);
            let report = checker.check(&dataset);
            println!("\n{}", checker.generate_summary(&report));

            if report.is_clean() {
                println!("✅ No integrity issues found");
            } else {
                println!("⚠️  Found {} integrity issues", report.violations.len());
            }
        }

        Commands::Export {
            output_dir,
            compression,
        } => {
            let writer = ParquetWriter::new().with_compression(compression);
            let dataset = load_dataset(&settings, false).await?;

            std::fs::create_dir_all(&output_dir)?;
            let measurement_path = output_dir.join(MEASUREMENT_PARQUET_FILE);
            let station_path = output_dir.join(STATION_PARQUET_FILE);

            writer.write_measurements(dataset.measurements(), &measurement_path)?;
            writer.write_stations(dataset.stations(), &station_path)?;

            for path in [&measurement_path, &station_path] {
                let file_info = writer.get_file_info(path)?;
                println!("\n{}\n{}", path.display(), file_info.summary());
            }

            println!("Export complete!");
        }
    }

    Ok(())
}

/// Load the configured snapshot behind a spinner, logging integrity findings.
async fn load_dataset(settings: &Settings, silent: bool) -> Result<Dataset> {
    let progress = ProgressReporter::new_spinner("Loading climate snapshot...", silent);

    let loader = SnapshotLoader::new(&settings.data.dir)
        .with_format(settings.data.format)
        .with_mmap(settings.data.mmap);
    let dataset = loader.load().await?;

    progress.set_message("Checking snapshot integrity...");
    let report = IntegrityChecker::new().check(&dataset);
    if report.unknown_station_measurements > 0 {
        warn!(
            "{} measurements reference stations missing from the roster",
            report.unknown_station_measurements
        );
    }
    if report.duplicate_readings > 0 {
        warn!(
            "{} duplicate station/date readings",
            report.duplicate_readings
        );
    }
    if dataset.is_empty() {
        warn!("Snapshot has no measurements; recent-year queries will fail");
    }

    progress.finish_with_message(&format!(
        "Loaded {} measurements from {} stations",
        dataset.measurement_count(),
        dataset.station_count()
    ));
    info!("Snapshot ready");

    Ok(dataset)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
