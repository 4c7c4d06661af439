pub mod integrity_checker;

pub use integrity_checker::{
    IntegrityChecker, IntegrityReport, IntegrityViolation, StationStatistics, ViolationType,
};
