//! Race-level bookkeeping
use serde::{Deserialize, Serialize};

use crate::time::Time;

/// Remaining race clock plus the fixed circuit losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceParameters {
    remaining: Time,
    out_lap_time_loss: Time,
    in_lap_time_loss: Time,
    /// Slower class cars on track; read by strategy code only.
    lower_class_cars: u32,
    avg_overtake_time_loss: Time,
}

impl RaceParameters {
    #[must_use]
    pub const fn new(
        race_length: Time,
        out_lap_time_loss: Time,
        in_lap_time_loss: Time,
        lower_class_cars: u32,
        avg_overtake_time_loss: Time,
    ) -> Self {
        Self {
            remaining: race_length,
            out_lap_time_loss,
            in_lap_time_loss,
            lower_class_cars,
            avg_overtake_time_loss,
        }
    }

    /// Take a completed lap off the race clock. The clock may go negative.
    pub fn record_lap(&mut self, lap: Time) {
        self.remaining -= lap;
    }

    #[must_use]
    pub const fn remaining(&self) -> Time {
        self.remaining
    }

    /// True once the clock has run out.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining.as_millis() <= 0
    }

    pub(crate) const fn set_remaining(&mut self, remaining: Time) {
        self.remaining = remaining;
    }

    #[must_use]
    pub const fn out_lap_time_loss(&self) -> Time {
        self.out_lap_time_loss
    }

    #[must_use]
    pub const fn in_lap_time_loss(&self) -> Time {
        self.in_lap_time_loss
    }

    #[must_use]
    pub const fn lower_class_cars(&self) -> u32 {
        self.lower_class_cars
    }

    #[must_use]
    pub const fn avg_overtake_time_loss(&self) -> Time {
        self.avg_overtake_time_loss
    }
}
