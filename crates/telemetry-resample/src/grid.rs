//! Uniform Time Grid Builder

use crate::error::ResampleError;
use crate::gap::GapSpan;

/// Tolerance on the inclusive upper bound of the grid (seconds)
pub const GRID_EPSILON: f64 = 1e-9;

/// Grid points that survive gap exclusion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridWalk {
    /// Kept timestamps, ascending
    pub points: Vec<f64>,
    /// Grid points skipped inside gaps
    pub excluded: usize,
}

impl GridWalk {
    /// Size of the full grid before exclusion
    pub fn total(&self) -> usize {
        self.points.len() + self.excluded
    }
}

/// Build the uniform grid `t0, t0 + 1/rate, ...` up to the last source timestamp.
///
/// `times` must be sorted. Fewer than two points or a zero-duration trace
/// yields an empty grid.
pub fn build_grid(times: &[f64], rate_hz: u32) -> Result<Vec<f64>, ResampleError> {
    Ok(build_grid_excluding(times, rate_hz, &[])?.points)
}

/// Build the uniform grid, skipping every point strictly inside one of `spans`.
///
/// Skipped stretches are jumped over by index, so cost follows the number of
/// kept points rather than the time extent of the trace. `spans` must be
/// sorted and disjoint, as returned by `GapPolicy::detect`.
pub fn build_grid_excluding(
    times: &[f64],
    rate_hz: u32,
    spans: &[GapSpan],
) -> Result<GridWalk, ResampleError> {
    if rate_hz == 0 {
        return Err(ResampleError::InvalidRate(rate_hz));
    }

    let (t0, t1) = match (times.first(), times.last()) {
        (Some(&first), Some(&last)) if times.len() >= 2 => (first, last),
        _ => return Ok(GridWalk::default()),
    };
    if !t0.is_finite() || !t1.is_finite() || t1 <= t0 {
        return Ok(GridWalk::default());
    }

    let rate = rate_hz as f64;
    let upper = t1 + GRID_EPSILON;
    // Offsets are i / rate, never an accumulated step
    let at = |i: u64| t0 + i as f64 / rate;

    let mut walk = GridWalk::default();
    let mut span_index = 0usize;
    let mut i = 0u64;

    loop {
        let t = at(i);
        if t > upper {
            break;
        }

        while span_index < spans.len() && spans[span_index].end - GRID_EPSILON <= t {
            span_index += 1;
        }

        match spans.get(span_index) {
            Some(span) if span.contains(t) => {
                let next = first_index_at_or_after(span.end - GRID_EPSILON, i, t0, rate);
                walk.excluded += (next - i) as usize;
                i = next;
            }
            _ => {
                walk.points.push(t);
                i += 1;
            }
        }
    }

    Ok(walk)
}

/// Smallest index `j > from` with `at(j) >= bound`
fn first_index_at_or_after(bound: f64, from: u64, t0: f64, rate: f64) -> u64 {
    let at = |i: u64| t0 + i as f64 / rate;
    let estimate = ((bound - t0) * rate).ceil().max(0.0) as u64;
    let mut j = estimate.max(from + 1);
    while j > from + 1 && at(j - 1) >= bound {
        j -= 1;
    }
    while at(j) < bound {
        j += 1;
    }
    j
}
