pub mod climate_analyzer;
pub mod date_window;
pub mod station_ranker;

pub use climate_analyzer::ClimateAnalyzer;
pub use date_window::{latest_date, trailing_window, DateWindow};
pub use station_ranker::{most_active_station, station_activity};
