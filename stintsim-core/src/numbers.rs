//! Numeric conversion helpers centralizing the float/millisecond casts.

use num_traits::cast::cast;

fn i64_bounds() -> (f64, f64) {
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    (min, max)
}

/// Round a f64 half away from zero and clamp it to the i64 range, returning 0 for NaN.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let (min, max) = i64_bounds();
    let clamped = value.clamp(min, max).round();
    cast::<f64, i64>(clamped).unwrap_or(if clamped > 0.0 { i64::MAX } else { i64::MIN })
}

/// Truncate a f64 toward zero and clamp it to the i64 range, returning 0 for NaN.
#[must_use]
pub fn trunc_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let (min, max) = i64_bounds();
    let clamped = value.clamp(min, max).trunc();
    cast::<f64, i64>(clamped).unwrap_or(if clamped > 0.0 { i64::MAX } else { i64::MIN })
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Floor a non-negative f64 into a lap count, returning 0 for negative or non-finite values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(value.min(max).floor()).unwrap_or(0)
}
