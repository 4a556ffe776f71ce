//! Client settings read from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use conquest_core::{HexLayout, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};
use conquest_gateway_http::DEFAULT_SERVER_URL;
use conquest_rendering::Presentation;
use conquest_system_session::{SessionConfig, DEFAULT_COMMAND_TIMEOUT, DEFAULT_SAVE_NAME};
use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

const WINDOW_TITLE: &str = "Strategic Conquest";

/// Failure to produce usable settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`Settings`].
    #[error("failed to parse {}", path.display())]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// A value is outside its accepted range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Name of the offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Every tunable of the client. Missing keys keep their defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Base URL of the game server.
    pub(crate) server_url: String,
    /// Offset columns requested for new games.
    pub(crate) map_width: u32,
    /// Offset rows requested for new games.
    pub(crate) map_height: u32,
    /// Hex corner radius in pixels.
    pub(crate) hex_size: f32,
    /// Grid translation from the centre of the map area.
    pub(crate) offset: [f32; 2],
    /// Initial window width in pixels.
    pub(crate) window_width: f32,
    /// Initial window height in pixels.
    pub(crate) window_height: f32,
    /// Whether presentation waits for vertical sync.
    pub(crate) vsync: bool,
    /// Time allowed for one server round trip, in milliseconds.
    pub(crate) command_timeout_ms: u64,
    /// Name used when saving.
    pub(crate) save_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            hex_size: HexLayout::DEFAULT_HEX_SIZE,
            offset: HexLayout::DEFAULT_OFFSET.to_array(),
            window_width: 1280.0,
            window_height: 800.0,
            vsync: true,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT.as_millis() as u64,
            save_name: DEFAULT_SAVE_NAME.to_owned(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rejects values the client cannot work with.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(ConfigError::Invalid {
                field: "map_width/map_height",
                reason: "the map needs at least one column and one row",
            });
        }
        if !(self.hex_size.is_finite() && self.hex_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "hex_size",
                reason: "must be a positive number of pixels",
            });
        }
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "command_timeout_ms",
                reason: "must be greater than zero",
            });
        }
        if self.save_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "save_name",
                reason: "must not be blank",
            });
        }
        Ok(())
    }

    /// Session parameters derived from the settings.
    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig {
            map_width: self.map_width,
            map_height: self.map_height,
            command_timeout: Duration::from_millis(self.command_timeout_ms),
            save_name: self.save_name.clone(),
            layout: HexLayout::new(self.hex_size, Vec2::from(self.offset), Vec2::ZERO),
        }
    }

    /// Window descriptor derived from the settings.
    pub(crate) fn presentation(&self) -> Presentation {
        Presentation::new(
            WINDOW_TITLE,
            Vec2::new(self.window_width, self.window_height),
            self.vsync,
        )
    }
}
