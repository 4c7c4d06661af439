use chrono::NaiveDate;
use climate_query::analyzers::{latest_date, most_active_station, ClimateAnalyzer};
use climate_query::readers::{SnapshotFormat, SnapshotLoader};
use climate_query::server::{router, AppState};
use climate_query::store::{Dataset, RecordStore};
use climate_query::utils::constants::{
    MEASUREMENT_CSV_FILE, MEASUREMENT_PARQUET_FILE, STATION_CSV_FILE, STATION_PARQUET_FILE,
};
use climate_query::writers::{ParquetCompression, ParquetWriter};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two years of readings for three stations; USC00519281 reports daily,
/// the others every other day or weekly.
fn write_snapshot(dir: &Path) {
    let mut measurements = String::from("id,station,date,prcp,tobs\n");
    let start = date(2015, 8, 23);
    let mut id = 1;

    for offset in 0..=731 {
        let day = start + chrono::Duration::days(offset);
        let tobs = 65 + (offset % 20);
        let prcp = if offset % 5 == 0 {
            String::new()
        } else {
            format!("{:.2}", (offset % 7) as f64 * 0.01)
        };

        let mut push = |station: &str| {
            measurements.push_str(&format!("{},{},{},{},{}\n", id, station, day, prcp, tobs));
            id += 1;
        };

        push("USC00519281");
        if offset % 2 == 0 {
            push("USC00513117");
        }
        if offset % 7 == 0 {
            push("USC00519397");
        }
    }

    fs::write(dir.join(MEASUREMENT_CSV_FILE), measurements).unwrap();
    fs::write(
        dir.join(STATION_CSV_FILE),
        "id,station,name,latitude,longitude,elevation\n\
         1,USC00519397,\"WAIKIKI 717.2, HI US\",21.2716,-157.8168,3.0\n\
         2,USC00513117,\"KANEOHE 838.1, HI US\",21.4234,-157.8015,14.6\n\
         3,USC00519281,\"WAIHEE 837.5, HI US\",21.45167,-157.84889,32.9\n",
    )
    .unwrap();
}

async fn load(dir: &Path, format: SnapshotFormat) -> Dataset {
    SnapshotLoader::new(dir)
        .with_format(format)
        .load()
        .await
        .expect("snapshot loads")
}

#[tokio::test]
async fn test_queries_over_csv_snapshot() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write_snapshot(temp_dir.path());

    let dataset = load(temp_dir.path(), SnapshotFormat::Auto).await;
    let analyzer = ClimateAnalyzer::new(&dataset);

    let latest = latest_date(dataset.measurements()).unwrap();
    assert_eq!(latest, date(2017, 8, 23));

    let series = analyzer.precipitation_series();
    assert_eq!(series.len(), dataset.measurement_count());
    assert!(series.windows(2).all(|w| w[0].date <= w[1].date));
    assert!(series.iter().any(|e| e.precipitation.is_none()));

    assert_eq!(
        analyzer.station_roster(),
        vec!["USC00519397", "USC00513117", "USC00519281"]
    );

    let winner = most_active_station(dataset.measurements()).unwrap();
    assert_eq!(winner, "USC00519281");

    let recent = analyzer.recent_year_temperatures().unwrap();
    // Daily readings over an inclusive 365-day window
    assert_eq!(recent.len(), 366);
    assert_eq!(recent.first().unwrap().date, latest);
    assert_eq!(recent.last().unwrap().date, date(2016, 8, 23));
    assert!(recent.windows(2).all(|w| w[0].date > w[1].date));

    let stats = analyzer
        .temperature_stats(date(2016, 8, 23), Some(date(2017, 8, 23)))
        .unwrap();
    assert!(stats.tmin <= stats.tavg && stats.tavg <= stats.tmax);
    assert_eq!(stats.tmin, 65.0);
    assert_eq!(stats.tmax, 84.0);

    assert!(analyzer.temperature_stats(date(2099, 1, 1), None).is_none());
}

#[tokio::test]
async fn test_parquet_export_serves_same_answers() {
    let csv_dir = TempDir::new().unwrap();
    write_snapshot(csv_dir.path());
    let from_csv = load(csv_dir.path(), SnapshotFormat::Csv).await;

    let parquet_dir = TempDir::new().unwrap();
    let writer = ParquetWriter::new().with_compression(ParquetCompression::Gzip);
    writer
        .write_measurements(
            from_csv.measurements(),
            &parquet_dir.path().join(MEASUREMENT_PARQUET_FILE),
        )
        .unwrap();
    writer
        .write_stations(
            from_csv.stations(),
            &parquet_dir.path().join(STATION_PARQUET_FILE),
        )
        .unwrap();

    let loader = SnapshotLoader::new(parquet_dir.path());
    assert_eq!(loader.resolve_format(), SnapshotFormat::Parquet);
    let from_parquet = loader.load().await.unwrap();

    let csv_analyzer = ClimateAnalyzer::new(&from_csv);
    let parquet_analyzer = ClimateAnalyzer::new(&from_parquet);

    assert_eq!(
        csv_analyzer.precipitation_series(),
        parquet_analyzer.precipitation_series()
    );
    assert_eq!(
        csv_analyzer.station_roster(),
        parquet_analyzer.station_roster()
    );
    assert_eq!(
        csv_analyzer.recent_year_temperatures().unwrap(),
        parquet_analyzer.recent_year_temperatures().unwrap()
    );
}

#[tokio::test]
async fn test_http_api_over_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    write_snapshot(temp_dir.path());
    let dataset = load(temp_dir.path(), SnapshotFormat::Csv).await;
    let app = router(AppState::new(Arc::new(dataset)));

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/v1.0/2017-08-23/2017-08-23")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let row = &stats[0];
    assert_eq!(row["tmin"], row["tmax"]);
    assert_eq!(row["tavg"], row["tmax"]);

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/v1.0/23-08-2017")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}
