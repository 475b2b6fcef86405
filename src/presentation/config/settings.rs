use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const MEGABYTE: usize = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub extraction: ExtractionSettings,
    pub ocr: OcrSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub max_file_size_mb: usize,
    pub max_request_size_mb: usize,
    /// Whole-batch deadline. Files still running when it passes fail
    /// individually; `None` waits for every file.
    pub batch_deadline_secs: Option<u64>,
    pub parse_timeout_secs: u64,
}

impl ExtractionSettings {
    pub fn max_file_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(MEGABYTE)
    }

    pub fn max_request_bytes(&self) -> usize {
        self.max_request_size_mb.saturating_mul(MEGABYTE)
    }

    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch_deadline_secs.map(Duration::from_secs)
    }

    pub fn parse_timeout(&self) -> Duration {
        Duration::from_secs(self.parse_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    pub enabled: bool,
    /// Tesseract language codes, `+`-joined (`eng+deu`).
    pub languages: String,
    pub binary_path: String,
    pub timeout_secs: u64,
}

impl OcrSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Layers built-in defaults, the optional `appsettings.{environment}` file
    /// and `APP_`-prefixed environment variables (`APP_SERVER__PORT=8080`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)?
            .set_default("extraction.max_file_size_mb", 25)?
            .set_default("extraction.max_request_size_mb", 100)?
            .set_default("extraction.parse_timeout_secs", 30)?
            .set_default("ocr.enabled", true)?
            .set_default("ocr.languages", "eng")?
            .set_default("ocr.binary_path", "tesseract")?
            .set_default("ocr.timeout_secs", 60)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
