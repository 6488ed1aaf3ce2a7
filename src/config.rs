//! File-based configuration.
//!
//! The config file carries the server address, the gazetteer of named
//! locations and optional seed reports. `BIND_ADDR` and `PORT` override the
//! `[server]` table.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gazetteer::Gazetteer;
use crate::models::{NamedLocation, SafetyReport};
use crate::reports::NewReport;

pub const DEFAULT_CONFIG_PATH: &str = "assets/amsterdam.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub locations: Vec<NamedLocation>,
    #[serde(default)]
    pub reports: Vec<NewReport>,
}

impl Config {
    /// Reads and parses a TOML config file, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// `PORT` is not a valid port number.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let label = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: label.clone(),
            source,
        })?;

        let mut config = Self::parse(&contents, &label)?;
        config.apply_overrides(
            std::env::var("BIND_ADDR").ok(),
            std::env::var("PORT").ok(),
        )?;

        log::info!(
            "Loaded config {label}: {} locations, {} seed reports",
            config.locations.len(),
            config.reports.len()
        );
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML.
    pub fn parse(contents: &str, label: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: label.to_string(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Port`] if `port` does not parse as a `u16`.
    pub fn apply_overrides(
        &mut self,
        bind_addr: Option<String>,
        port: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(bind_addr) = bind_addr {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = port {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Port(port))?;
        }
        Ok(())
    }

    /// Builds the gazetteer, rejecting entries with invalid coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Location`] naming the first bad entry.
    pub fn gazetteer(&self) -> Result<Gazetteer, ConfigError> {
        for location in &self.locations {
            location
                .point()
                .validate()
                .map_err(|source| ConfigError::Location {
                    name: location.name.clone(),
                    source,
                })?;
        }
        Ok(Gazetteer::new(self.locations.clone()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Report`] if a seed report has an invalid
    /// location.
    pub fn seed_reports(&self) -> Result<Vec<SafetyReport>, ConfigError> {
        self.reports
            .iter()
            .cloned()
            .map(|r| r.into_report().map_err(ConfigError::from))
            .collect()
    }
}
