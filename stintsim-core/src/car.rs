//! Car fuel and tyre model
use serde::{Deserialize, Serialize};

use crate::degradation::QuadraticEquation;
use crate::numbers::floor_f64_to_u32;
use crate::time::Time;

/// Physical state of one car: fuel load plus the constants that turn fuel
/// and tyre age into lap time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarParameters {
    /// Tank capacity in liters
    fuel_capacity: f64,
    /// Liters per second delivered by the rig
    refuel_rate: f64,
    /// Liters burned per lap
    fuel_consumption: f64,
    /// Time gained per liter below a full tank
    fuel_time_gain: Time,
    tyre_change_time: Time,
    tyre_degradation: QuadraticEquation,
    fuel: f64,
}

impl CarParameters {
    /// Create a car that starts on a full tank.
    #[must_use]
    pub const fn new(
        fuel_capacity: f64,
        refuel_rate: f64,
        fuel_consumption: f64,
        fuel_time_gain: Time,
        tyre_change_time: Time,
        tyre_degradation: QuadraticEquation,
    ) -> Self {
        Self {
            fuel_capacity,
            refuel_rate,
            fuel_consumption,
            fuel_time_gain,
            tyre_change_time,
            tyre_degradation,
            fuel: fuel_capacity,
        }
    }

    #[must_use]
    pub const fn fuel(&self) -> f64 {
        self.fuel
    }

    /// Set the fuel level and return the level now in the tank.
    ///
    /// Values outside `[0, capacity]` and non-finite values are ignored and
    /// the previous level is kept.
    pub fn set_fuel(&mut self, value: f64) -> f64 {
        if value.is_finite() && (0.0..=self.fuel_capacity).contains(&value) {
            self.fuel = value;
        }
        self.fuel
    }

    /// Unchecked fuel assignment used when rewinding a simulation; the
    /// level may be negative after the car has run dry.
    pub(crate) const fn restore_fuel(&mut self, fuel: f64) {
        self.fuel = fuel;
    }

    #[must_use]
    pub const fn fuel_capacity(&self) -> f64 {
        self.fuel_capacity
    }

    #[must_use]
    pub const fn refuel_rate(&self) -> f64 {
        self.refuel_rate
    }

    #[must_use]
    pub const fn fuel_consumption(&self) -> f64 {
        self.fuel_consumption
    }

    #[must_use]
    pub const fn tyre_change_time(&self) -> Time {
        self.tyre_change_time
    }

    #[must_use]
    pub const fn tyre_degradation(&self) -> &QuadraticEquation {
        &self.tyre_degradation
    }

    /// Time bonus from running below a full tank.
    #[must_use]
    pub fn fuel_time_gain(&self) -> Time {
        (self.fuel_capacity - self.fuel) * self.fuel_time_gain
    }

    /// Time lost to wear on a tyre that has completed `tyre_laps` laps.
    #[must_use]
    pub fn tyre_time_loss(&self, tyre_laps: u32) -> Time {
        Time::from_seconds(self.tyre_degradation.evaluate(f64::from(tyre_laps)))
    }

    /// Fill the tank and return the time spent refueling.
    pub fn top_off(&mut self) -> Time {
        let added = self.fuel_capacity - self.fuel;
        self.fuel = self.fuel_capacity;
        Time::from_seconds(added / self.refuel_rate)
    }

    /// Add `amount` liters and return the time spent refueling.
    ///
    /// A request that would overflow the tank becomes a top-off.
    pub fn add_fuel(&mut self, amount: f64) -> Time {
        if self.fuel + amount <= self.fuel_capacity {
            self.fuel += amount;
            Time::from_seconds(amount / self.refuel_rate)
        } else {
            self.top_off()
        }
    }

    /// Burn one lap of fuel. The level is allowed to go negative.
    pub fn consume_lap_fuel(&mut self) {
        self.fuel -= self.fuel_consumption;
    }

    /// Full laps the current load covers.
    #[must_use]
    pub fn laps_of_fuel(&self) -> u32 {
        if self.fuel_consumption <= 0.0 {
            return u32::MAX;
        }
        floor_f64_to_u32(self.fuel / self.fuel_consumption)
    }
}
