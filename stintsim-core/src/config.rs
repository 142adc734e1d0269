//! Race, car and simulation configuration loaded from JSON.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::car::CarParameters;
use crate::degradation::QuadraticEquation;
use crate::race::RaceParameters;
use crate::simulation::Simulation;
use crate::time::Time;

const DEFAULT_PRESET: &str = include_str!("../assets/endurance_6h.json");

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("initial fuel {fuel:.2} L outside tank of {capacity:.2} L")]
    InitialFuel { fuel: f64, capacity: f64 },
    #[error("race length must be positive (got {0})")]
    RaceLength(Time),
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Circuit-dependent race settings. Durations are integer milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RaceConfig {
    pub race_length: Time,
    #[serde(default)]
    pub out_lap_time_loss: Time,
    #[serde(default)]
    pub in_lap_time_loss: Time,
    #[serde(default)]
    pub lower_class_cars: u32,
    #[serde(default)]
    pub avg_overtake_time_loss: Time,
}

impl RaceConfig {
    #[must_use]
    pub const fn build(&self) -> RaceParameters {
        RaceParameters::new(
            self.race_length,
            self.out_lap_time_loss,
            self.in_lap_time_loss,
            self.lower_class_cars,
            self.avg_overtake_time_loss,
        )
    }
}

/// Car-dependent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CarConfig {
    /// Tank capacity in liters
    pub fuel_capacity: f64,
    /// Liters per second
    pub refuel_rate: f64,
    /// Liters per lap
    pub fuel_consumption: f64,
    /// Time per liter of tank deficit
    #[serde(default)]
    pub fuel_time_gain: Time,
    #[serde(default)]
    pub tyre_change_time: Time,
    #[serde(default)]
    pub tyre_degradation: QuadraticEquation,
    /// Starting load; a full tank when absent.
    #[serde(default)]
    pub initial_fuel: Option<f64>,
}

impl CarConfig {
    #[must_use]
    pub fn build(&self) -> CarParameters {
        let mut car = CarParameters::new(
            self.fuel_capacity,
            self.refuel_rate,
            self.fuel_consumption,
            self.fuel_time_gain,
            self.tyre_change_time,
            self.tyre_degradation,
        );
        if let Some(fuel) = self.initial_fuel {
            car.set_fuel(fuel);
        }
        car
    }
}

/// Everything needed to start a simulated race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// Clean-air lap on a full tank and fresh tyres
    pub baseline_lap: Time,
    /// Driver variance in seconds
    #[serde(default)]
    pub driver_std_dev: f64,
    #[serde(default)]
    pub seed: u64,
    pub race: RaceConfig,
    pub car: CarConfig,
}

impl SimulationConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Bundled six-hour endurance preset.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_PRESET).unwrap_or_default()
    }

    /// Check the invariants the lap engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let car = &self.car;
        require_positive("car.fuel_capacity", car.fuel_capacity)?;
        require_positive("car.refuel_rate", car.refuel_rate)?;
        require_non_negative("car.fuel_consumption", car.fuel_consumption)?;
        require_non_negative("driver_std_dev", self.driver_std_dev)?;
        for (field, value) in [
            ("car.tyre_degradation.a", car.tyre_degradation.a),
            ("car.tyre_degradation.b", car.tyre_degradation.b),
            ("car.tyre_degradation.c", car.tyre_degradation.c),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        if let Some(fuel) = car.initial_fuel
            && !(fuel.is_finite() && (0.0..=car.fuel_capacity).contains(&fuel))
        {
            return Err(ConfigError::InitialFuel {
                fuel,
                capacity: car.fuel_capacity,
            });
        }
        if self.race.race_length <= Time::ZERO {
            return Err(ConfigError::RaceLength(self.race.race_length));
        }
        Ok(())
    }

    /// Validate and build a simulation seeded from the configured seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(&self) -> Result<Simulation, ConfigError> {
        self.build_with_seed(self.seed)
    }

    /// Validate and build a simulation with an explicit seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build_with_seed(&self, seed: u64) -> Result<Simulation, ConfigError> {
        self.validate()?;
        Ok(Simulation::new(
            self.baseline_lap,
            self.driver_std_dev,
            self.race.build(),
            self.car.build(),
            seed,
        ))
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}
