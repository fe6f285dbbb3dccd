use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::matching::{MatchSettings, StorageLocation, DEFAULT_THRESHOLD};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matcher: MatcherConfig,
    pub firebase: FirebaseConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let threshold = match env::var("PHOTO_MATCH_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        let timeout_seconds = match env::var("FIREBASE_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let matcher = MatcherConfig {
            bucket: env::var("PHOTO_BUCKET")
                .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            storage_host: env::var("PHOTO_STORAGE_HOST")
                .unwrap_or_else(|_| DEFAULT_STORAGE_HOST.to_string()),
            candidate_prefix: env::var("PHOTO_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            threshold,
        };

        let firebase = FirebaseConfig {
            storage_api_url: env::var("STORAGE_API_URL")
                .unwrap_or_else(|_| DEFAULT_STORAGE_API_URL.to_string()),
            database_url: env::var("FIREBASE_DATABASE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            records_path: env::var("FIREBASE_RECORDS_PATH")
                .unwrap_or_else(|_| DEFAULT_RECORDS_PATH.to_string()),
            access_token: env::var("FIREBASE_ACCESS_TOKEN")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            timeout_seconds,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matcher,
            firebase,
        })
    }
}

pub const DEFAULT_BUCKET: &str = "manjano-bus.appspot.com";
pub const DEFAULT_STORAGE_HOST: &str = "firebasestorage.googleapis.com";
pub const DEFAULT_PREFIX: &str = "Children Images/";
pub const DEFAULT_STORAGE_API_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_RECORDS_PATH: &str = "children";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Accepts a similarity threshold in `(0, 1]`.
pub fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidThreshold(raw.to_string()))?;

    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidThreshold(raw.to_string()))
    }
}

/// Accepts a whole, non-zero number of seconds.
fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where photos live and how strict matching is.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub bucket: String,
    pub storage_host: String,
    pub candidate_prefix: String,
    pub threshold: f64,
}

impl MatcherConfig {
    pub fn settings(&self) -> MatchSettings {
        MatchSettings {
            threshold: self.threshold,
            location: StorageLocation::new(&self.storage_host, &self.bucket),
        }
    }
}

/// Endpoints and credentials for the storage listing and record store.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub storage_api_url: String,
    pub database_url: Option<String>,
    pub records_path: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
}

impl FirebaseConfig {
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingVariable("FIREBASE_DATABASE_URL"))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold(String),
    InvalidTimeout(String),
    MissingVariable(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold(raw) => write!(
                f,
                "match threshold must be a number in (0, 1], got '{}'",
                raw
            ),
            ConfigError::InvalidTimeout(raw) => write!(
                f,
                "FIREBASE_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
                raw
            ),
            ConfigError::MissingVariable(name) => write!(f, "{} must be set", name),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold(_)
            | ConfigError::InvalidTimeout(_)
            | ConfigError::MissingVariable(_) => None,
        }
    }
}
