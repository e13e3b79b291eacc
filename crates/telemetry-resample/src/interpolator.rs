//! Piecewise-Linear Field Interpolator

use crate::error::ResampleError;
use std::cmp::Ordering;

/// Interpolate `src_value` (sampled at `src_time`) at each grid timestamp.
///
/// Grid points before the first or after the last source knot are clamped to
/// the endpoint values. Values at source knots are reproduced exactly.
/// `src_time` must be strictly increasing; `grid` is expected sorted so a
/// single forward cursor suffices, but unsorted grids are still answered.
pub fn interpolate(
    grid: &[f64],
    src_time: &[f64],
    src_value: &[f64],
) -> Result<Vec<f64>, ResampleError> {
    if src_time.len() != src_value.len() {
        return Err(ResampleError::LengthMismatch {
            times: src_time.len(),
            values: src_value.len(),
        });
    }
    if src_time.is_empty() {
        return Err(ResampleError::EmptySource);
    }
    if let Some(index) = src_time.windows(2).position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater)) {
        return Err(ResampleError::NonIncreasingTime { index: index + 1 });
    }

    let last = src_time.len() - 1;
    let mut cursor = 0usize;
    let mut out = Vec::with_capacity(grid.len());

    for &t in grid {
        if t <= src_time[0] {
            out.push(src_value[0]);
            continue;
        }
        if t >= src_time[last] {
            out.push(src_value[last]);
            continue;
        }

        // Find segment with src_time[cursor] <= t < src_time[cursor + 1]
        if src_time[cursor] > t {
            cursor = src_time.partition_point(|&s| s <= t) - 1;
        }
        while src_time[cursor + 1] <= t {
            cursor += 1;
        }

        let (t_a, t_b) = (src_time[cursor], src_time[cursor + 1]);
        let (v_a, v_b) = (src_value[cursor], src_value[cursor + 1]);
        if t == t_a {
            out.push(v_a);
        } else {
            out.push(v_a + (t - t_a) * (v_b - v_a) / (t_b - t_a));
        }
    }

    Ok(out)
}
