//! Heading Unwrap/Wrap
//!
//! Linear interpolation of a heading across the 0/360 seam would travel the
//! long way round. Headings are unwrapped into a continuous signal before
//! interpolation and wrapped back into `[0, 360)` afterwards.

use serde::{Deserialize, Serialize};

const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// How an interpolated heading returns to its circular range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapBehavior {
    /// True modulo into `[0, 360)`
    #[default]
    #[serde(rename = "mod_360")]
    Mod360,
}

impl WrapBehavior {
    /// Contract spelling of the behavior
    pub fn as_str(&self) -> &'static str {
        match self {
            WrapBehavior::Mod360 => "mod_360",
        }
    }

    /// Map an unwrapped heading back onto the circle
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            WrapBehavior::Mod360 => wrap_one(value),
        }
    }
}

/// Unwrap a circular signal (degrees) into a continuous one.
///
/// Each step adds the multiple of 360 that brings the jump from the previous
/// converted value within 180 degrees. A jump of exactly +180 is kept positive.
pub fn unwrap_degrees(series: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    let Some((&first, rest)) = series.split_first() else {
        return out;
    };

    out.push(first);
    let mut previous = first;
    let mut correction = 0.0;

    for &value in rest {
        let step = value - previous;
        if step.abs() >= HALF_TURN {
            let mut folded = (step + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
            if folded == -HALF_TURN && step > 0.0 {
                folded = HALF_TURN;
            }
            correction += folded - step;
        }
        out.push(value + correction);
        previous = value;
    }

    out
}

/// Wrap any real-valued angle into `[0, 360)` with true modulo.
pub fn wrap_degrees(series: &[f64]) -> Vec<f64> {
    series.iter().map(|&v| wrap_one(v)).collect()
}

pub(crate) fn wrap_one(value: f64) -> f64 {
    let wrapped = value.rem_euclid(FULL_TURN);
    // Tiny negative inputs round up to exactly 360; also folds -0.0
    if wrapped >= FULL_TURN || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}
