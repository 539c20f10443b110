/*
 * Responsibility
 * - Read environment settings (.env supported) for the demo server
 * - Turn them into an explicit GateConfig; the gate itself never reads env
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::{GateConfig, access_jwt::DEFAULT_LEEWAY_SECONDS};

pub const PUB_KEY_FILE_VAR: &str = "JWT_GATE_PUB_KEY_FILE";
pub const PUB_KEY_PATH_VAR: &str = "JWT_GATE_PUB_KEY_PATH";
pub const EXPECTED_ISS_VAR: &str = "JWT_GATE_EXPECTED_ISS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub pub_key_file: Option<PathBuf>,
    pub pub_key_path: Option<PathBuf>,
    pub expected_issuer: Option<String>,
    pub leeway_seconds: u64,
    pub preload_key: bool,

    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let pub_key_file = non_empty(PUB_KEY_FILE_VAR).map(PathBuf::from);
        let pub_key_path = non_empty(PUB_KEY_PATH_VAR).map(PathBuf::from);
        let expected_issuer = non_empty(EXPECTED_ISS_VAR);

        let leeway_seconds = match non_empty("JWT_GATE_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("JWT_GATE_LEEWAY_SECONDS"))?,
            None => DEFAULT_LEEWAY_SECONDS,
        };

        let preload_key = match non_empty("JWT_GATE_PRELOAD_KEY") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("JWT_GATE_PRELOAD_KEY"))?,
            None => false,
        };

        let body_limit_bytes = match non_empty("HTTP_BODY_LIMIT_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("HTTP_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        let request_timeout = match non_empty("HTTP_TIMEOUT_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid("HTTP_TIMEOUT_SECONDS"))?,
            None => Duration::from_secs(30),
        };

        Ok(Self {
            addr,
            app_env,
            pub_key_file,
            pub_key_path,
            expected_issuer,
            leeway_seconds,
            preload_key,
            body_limit_bytes,
            request_timeout,
        })
    }

    /// `JWT_GATE_PUB_KEY_FILE` is the explicit key path and wins over the
    /// `JWT_GATE_PUB_KEY_PATH` override.
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            key_path: self.pub_key_file.clone(),
            key_path_override: self.pub_key_path.clone(),
            expected_issuer: self.expected_issuer.clone(),
            leeway_seconds: self.leeway_seconds,
            diagnostics: self.app_env == AppEnv::Test,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
