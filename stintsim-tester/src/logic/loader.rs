use std::fs;
use std::path::PathBuf;

use stintsim_core::{ConfigError, ConfigLoader, SimulationConfig};
use thiserror::Error;

/// Name that resolves to the preset bundled with the engine.
pub const BUILTIN_PRESET: &str = "builtin";

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Loads configurations from JSON files, or the bundled preset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ConfigLoader for FileLoader {
    type Error = LoaderError;

    fn load_config(&self, name: &str) -> Result<SimulationConfig, Self::Error> {
        if name == BUILTIN_PRESET {
            return Ok(SimulationConfig::load_from_static());
        }
        let path = PathBuf::from(name);
        let json = fs::read_to_string(&path).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        })?;
        let config = SimulationConfig::from_json(&json)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}
