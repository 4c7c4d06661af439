pub mod constants;
pub mod dates;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use dates::{parse_date_range, parse_query_date};
pub use progress::ProgressReporter;
