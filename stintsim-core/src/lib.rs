//! Stint Simulation Engine
//!
//! Lap-time model for one car in an endurance race: fuel load, tyre wear,
//! driver variance and pit-stop laps, with the remaining race clock kept
//! alongside. Strategy drivers call the lap operations on [`Simulation`]
//! one lap at a time.

pub mod car;
pub mod config;
pub mod degradation;
pub mod numbers;
pub mod race;
pub mod rng;
pub mod simulation;
pub mod time;

// Re-export commonly used types
pub use car::CarParameters;
pub use config::{CarConfig, ConfigError, RaceConfig, SimulationConfig};
pub use degradation::QuadraticEquation;
pub use race::RaceParameters;
pub use rng::{CountingRng, derive_stream_seed};
pub use simulation::{LapKind, Simulation, SimulationSnapshot};
pub use time::{Time, TimeError};

/// Trait for abstracting configuration loading.
/// Platform-specific implementations should provide this.
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a named simulation configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be found or parsed.
    fn load_config(&self, name: &str) -> Result<SimulationConfig, Self::Error>;

    /// Load a configuration and build a simulation seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the configuration is invalid.
    fn load_simulation(&self, name: &str, seed: u64) -> Result<Simulation, Self::Error>
    where
        Self::Error: From<ConfigError>,
    {
        let config = self.load_config(name)?;
        Ok(config.build_with_seed(seed)?)
    }
}
