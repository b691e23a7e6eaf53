//! Settings read from `config.toml`.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "padcalc";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    pub colour: bool,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "> ".to_owned(),
            colour: true,
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub display: (u8, u8, u8),
    pub error: (u8, u8, u8),
    pub message: (u8, u8, u8),
    pub carat: (u8, u8, u8),
    pub pass: (u8, u8, u8),
    pub fail: (u8, u8, u8),
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            display: (0xB4, 0xB4, 0xB4), // Light gray
            error: (0xDC, 0x64, 0x5A),   // Soft red
            message: (0x78, 0xB4, 0x78), // Soft green
            carat: (0xFF, 0x14, 0x00),   // Bright red
            pass: (0x50, 0xC8, 0x50),    // Green
            fail: (0xFF, 0x50, 0x50),    // Red
        }
    }
}

impl Config {
    /// Default location, `<config dir>/padcalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Loads `path`, or the default location when `None`.
    /// A missing file is not an error and gives the defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Config::default_path) {
            Some(path) => path,
            None => return Ok(Config::default()),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
