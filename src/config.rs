//! Layered runtime settings.
//!
//! Built-in defaults, then an optional TOML file, then `CLIMATE_*`
//! environment variables (`CLIMATE_SERVER__PORT=8080`), then command-line
//! overrides.

use crate::error::Result;
use crate::readers::SnapshotFormat;
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_PORT,
    DEFAULT_WINDOW_DAYS, ENV_PREFIX,
};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub data: DataSettings,

    #[validate(nested)]
    pub server: ServerSettings,

    #[validate(nested)]
    pub query: QuerySettings,

    #[validate(nested)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DataSettings {
    pub dir: PathBuf,
    pub format: SnapshotFormat,
    /// Memory-map CSV snapshots instead of buffered reads
    pub mmap: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                crate::error::QueryError::InvalidFormat(format!(
                    "Invalid bind address: {}:{}",
                    self.host, self.port
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuerySettings {
    #[validate(range(min = 1))]
    pub window_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    #[validate(length(min = 1))]
    pub level: String,
}

/// Values supplied on the command line. `None` leaves the layered value alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub data_dir: Option<PathBuf>,
    pub format: Option<SnapshotFormat>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub verbose: bool,
}

impl Settings {
    /// Load settings. An explicit `config_file` must exist; the default
    /// `climate-query.toml` is used only when present.
    pub fn load(config_file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let builder = Config::builder()
            .set_default("data.dir", DEFAULT_DATA_DIR)?
            .set_default("data.format", SnapshotFormat::Auto.as_str())?
            .set_default("data.mmap", false)?
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("query.window_days", i64::from(DEFAULT_WINDOW_DAYS))?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "data.dir",
                overrides
                    .data_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("data.format", overrides.format.map(|f| f.as_str()))?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("logging.level", overrides.verbose.then_some("debug"))?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: DataSettings {
                dir: PathBuf::from(DEFAULT_DATA_DIR),
                format: SnapshotFormat::Auto,
                mmap: false,
            },
            server: ServerSettings {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            query: QuerySettings {
                window_days: DEFAULT_WINDOW_DAYS,
            },
            logging: LoggingSettings {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() -> Result<()> {
        let settings = Settings::load(None, &SettingsOverrides::default())?;
        let defaults = Settings::default();

        assert_eq!(settings.query.window_days, defaults.query.window_days);
        assert_eq!(settings.data.format, SnapshotFormat::Auto);
        assert!(settings.server.socket_addr().is_ok());

        Ok(())
    }

    #[test]
    fn test_file_and_overrides() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[data]\ndir = \"/srv/climate\"\nformat = \"csv\"")?;
        writeln!(file, "[server]\nport = 8080")?;
        writeln!(file, "[query]\nwindow_days = 30")?;

        let overrides = SettingsOverrides {
            port: Some(9090),
            verbose: true,
            ..Default::default()
        };
        let settings = Settings::load(Some(file.path()), &overrides)?;

        assert_eq!(settings.data.dir, PathBuf::from("/srv/climate"));
        assert_eq!(settings.data.format, SnapshotFormat::Csv);
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.query.window_days, 30);
        assert_eq!(settings.logging.level, "debug");

        Ok(())
    }

    #[test]
    fn test_invalid_window_rejected() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[query]\nwindow_days = 0")?;

        assert!(Settings::load(Some(file.path()), &SettingsOverrides::default()).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("missing.toml");

        assert!(Settings::load(Some(&path), &SettingsOverrides::default()).is_err());
    }
}
