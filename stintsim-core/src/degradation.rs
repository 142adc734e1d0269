//! Tyre degradation curve.
use serde::{Deserialize, Serialize};

/// Quadratic time loss `a·x² + b·x + c`, in seconds, for a tyre of age `x` laps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuadraticEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticEquation {
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.a * x.powi(2) + self.b * x + self.c
    }
}
