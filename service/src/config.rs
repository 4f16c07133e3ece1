//! Configuration loaded from a TOML file (`config.toml` by default), with a
//! thin `clap` layer only for pointing at a different config file or
//! overriding the log level from the command line.

use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env, default_value = "config/config.toml")]
    pub config: PathBuf,

    /// Override the configured log level.
    #[arg(short, long, env)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    #[serde(default = "default_server_host")]
    server_host: String,
    #[serde(default = "default_server_port")]
    server_port: u16,
    #[serde(default = "default_assets_directory")]
    assets_directory: String,
    #[serde(default = "default_ovos_server_url")]
    ovos_server_url: String,
    #[serde(default = "default_client_id")]
    client_id: String,
    #[serde(default = "default_ping_period")]
    ping_period: f64,
    #[serde(default = "default_connection_check_wait")]
    connection_check_wait: f64,
    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}
fn default_server_port() -> u16 {
    8000
}
fn default_assets_directory() -> String {
    "assets".to_string()
}
fn default_ovos_server_url() -> String {
    "ws://localhost:18181/gui".to_string()
}
fn default_client_id() -> String {
    "gui-htmx-client".to_string()
}
fn default_ping_period() -> f64 {
    30.0
}
fn default_connection_check_wait() -> f64 {
    10.0
}
fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: default_server_port(),
            assets_directory: default_assets_directory(),
            ovos_server_url: default_ovos_server_url(),
            client_id: default_client_id(),
            ping_period: default_ping_period(),
            connection_check_wait: default_connection_check_wait(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub assets_directory: String,
    pub ovos_server_url: String,
    pub client_id: String,
    pub ping_period: Duration,
    pub connection_check_wait: Duration,
    pub log_level_filter: LevelFilter,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            server_host: raw.server_host,
            server_port: raw.server_port,
            assets_directory: raw.assets_directory,
            ovos_server_url: raw.ovos_server_url,
            client_id: raw.client_id,
            ping_period: Duration::from_secs_f64(raw.ping_period),
            connection_check_wait: Duration::from_secs_f64(raw.connection_check_wait),
            log_level_filter: LevelFilter::from_str(&raw.log_level).unwrap_or(LevelFilter::Info),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to built-in defaults for any field
    /// (or the whole file) that's missing. A missing config file is not an
    /// error: the gateway should still come up with sane defaults.
    pub fn load(path: &Path, log_level_override: Option<&str>) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                log::warn!("failed to parse {}: {e}, using defaults", path.display());
                RawConfig::default()
            }),
            Err(_) => {
                log::warn!("no config file at {}, using defaults", path.display());
                RawConfig::default()
            }
        };
        let mut config: Config = raw.into();
        if let Some(level) = log_level_override {
            if let Ok(filter) = LevelFilter::from_str(level) {
                config.log_level_filter = filter;
            }
        }
        config
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self::load(&cli.config, cli.log_level.as_deref())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ server: {}, ovos_server_url: {}, client_id: {} }}",
            self.server_addr(),
            self.ovos_server_url,
            self.client_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/config.toml"), None);
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.client_id, "gui-htmx-client");
    }

    #[test]
    fn log_level_override_takes_precedence() {
        let config = Config::load(Path::new("/nonexistent/config.toml"), Some("DEBUG"));
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }
}
