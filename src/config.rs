use crate::{geometry::Cell, search::Metric};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the configuration file, if the platform has a config directory.
pub fn path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("waypath").join("config.toml"))
}

/// Planner configuration.
///
/// Every field has a default, so an empty file (or none at all) is valid.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub guidance: GuidanceConfig,
}

#[serde_as]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Step-cost model and matching heuristic.
    pub metric: Metric,

    /// Give up after expanding this many cells. Unbounded when absent.
    pub max_iterations: Option<usize>,

    /// Goal used when the grid producer supplies no target, written `"row,col"`.
    /// Falls back to the far row, centre column.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub goal: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Repeat an unchanged directive once it has been suppressed this many times.
    pub repeat_after: u32,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        GuidanceConfig { repeat_after: 5 }
    }
}

impl Config {
    /// Save to the default location.
    pub fn save(&self) -> Result<(), Error> {
        self.save_to(&path().ok_or(Error::NoConfigDir)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let serialized = toml::to_string_pretty(self)?;
        std::fs::write(path, serialized.as_bytes()).map_err(Into::into)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&path().ok_or(Error::NoConfigDir)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read_to_string(path)?;
        data.parse()
    }

    /// Load from the default location, falling back to defaults if there is no file there.
    pub fn load_or_default() -> Result<Self, Error> {
        match Self::load() {
            Err(Error::NoConfigDir) => Ok(Self::default()),
            Err(Error::CouldNotLoad(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(Into::into)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration could not be loaded")]
    CouldNotLoad(#[from] std::io::Error),
    #[error("malformed configuration")]
    Malformed(#[from] toml::de::Error),
    #[error("failed to serialize")]
    CouldNotSerialize(#[from] toml::ser::Error),
    #[error("no configuration directory on this platform")]
    NoConfigDir,
}
