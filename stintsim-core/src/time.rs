//! Fixed-point race time stored as a signed millisecond count.
//!
//! Every arithmetic operation produces a fresh value; nothing mutates a
//! `Time` in place except the compound-assignment operators, which simply
//! rebind the left-hand side.
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbers::{i64_to_f64, round_f64_to_i64, trunc_f64_to_i64};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Errors raised by time arithmetic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    #[error("cannot divide {dividend} by a zero duration")]
    DivisionByZero { dividend: Time },
}

/// Signed duration with millisecond resolution.
///
/// Negative values are legal and represent a deficit, e.g. a race clock
/// that has run past zero.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Time(i64);

impl Time {
    pub const ZERO: Self = Self(0);

    /// Build a time from clock components.
    ///
    /// Any component may be zero or negative and `seconds` may carry a
    /// fraction; the total is rounded to the nearest millisecond.
    #[must_use]
    pub fn new(hours: i64, minutes: i64, seconds: f64, milliseconds: i64) -> Self {
        let whole_seconds = hours
            .saturating_mul(60)
            .saturating_add(minutes)
            .saturating_mul(60);
        let total =
            (i64_to_f64(whole_seconds) + seconds) * 1_000.0 + i64_to_f64(milliseconds);
        Self(round_f64_to_i64(total))
    }

    #[must_use]
    pub const fn from_millis(milliseconds: i64) -> Self {
        Self(milliseconds)
    }

    #[must_use]
    pub fn from_seconds(seconds: f64) -> Self {
        Self::new(0, 0, seconds, 0)
    }

    #[must_use]
    pub const fn from_hours(hours: i64) -> Self {
        Self(hours.saturating_mul(MILLIS_PER_HOUR as i64))
    }

    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn in_seconds(self) -> f64 {
        i64_to_f64(self.0) / 1_000.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Dimensionless ratio of two durations.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::DivisionByZero`] when `divisor` is zero.
    pub fn ratio_to(self, divisor: Self) -> Result<f64, TimeError> {
        if divisor.0 == 0 {
            return Err(TimeError::DivisionByZero { dividend: self });
        }
        Ok(i64_to_f64(self.0) / i64_to_f64(divisor.0))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let hours = abs / MILLIS_PER_HOUR;
        let minutes = (abs % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
        let seconds = (abs % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
        let millis = abs % MILLIS_PER_SECOND;
        write!(f, "{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

/// Saturates at the `i64` millisecond range.
impl Add for Time {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Time {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Time {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Scale by a real factor, truncating toward zero.
impl Mul<f64> for Time {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self(trunc_f64_to_i64(i64_to_f64(self.0) * factor))
    }
}

impl Mul<Time> for f64 {
    type Output = Time;

    fn mul(self, time: Time) -> Time {
        time * self
    }
}

/// Divide by a real factor, truncating toward zero. Use [`Time::ratio_to`]
/// to divide by another duration.
impl Div<f64> for Time {
    type Output = Self;

    fn div(self, factor: f64) -> Self {
        Self(trunc_f64_to_i64(i64_to_f64(self.0) / factor))
    }
}

impl Sum for Time {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
