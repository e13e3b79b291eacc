//! Series Resampler
//!
//! Composes grid construction, per-field interpolation and gap exclusion
//! over a sorted, deduplicated series.

use crate::angular::unwrap_degrees;
use crate::error::ResampleError;
use crate::gap::{GapPolicy, GapSpan};
use crate::grid::build_grid_excluding;
use crate::interpolator::interpolate;
use crate::{ResampleConfig, TelemetrySample};
use tracing::debug;

/// Resampled series plus bookkeeping for observability
#[derive(Debug, Clone, Default)]
pub struct ResampleOutput {
    /// One sample per surviving grid point
    pub samples: Vec<TelemetrySample>,
    /// Grid size before gap exclusion
    pub grid_points: usize,
    /// Gaps found in the source
    pub gap_spans: Vec<GapSpan>,
    /// Grid points dropped for falling inside a gap
    pub excluded: usize,
}

/// Resample `series` onto the uniform grid described by `config`.
///
/// `series` must be sorted by strictly increasing timestamp. Fewer than two
/// samples, or a zero-duration trace, produce an empty output. Gaps are
/// detected first and the grid walk skips them, so only surviving grid
/// points are ever materialized or interpolated.
pub fn resample_series(
    series: &[TelemetrySample],
    config: &ResampleConfig,
) -> Result<ResampleOutput, ResampleError> {
    config.validate()?;
    let policy = GapPolicy::new(config.max_gap_seconds)?;

    let times: Vec<f64> = series.iter().map(|s| s.timestamp).collect();
    let gap_spans = policy.detect(&times);
    let walk = build_grid_excluding(&times, config.rate_hz, &gap_spans)?;
    if walk.total() == 0 {
        debug!("Degenerate series ({} samples), nothing to resample", series.len());
        return Ok(ResampleOutput::default());
    }

    let grid = &walk.points;
    let lat = interpolate(grid, &times, &column(series, |s| s.lat))?;
    let lon = interpolate(grid, &times, &column(series, |s| s.lon))?;
    let speed = interpolate(grid, &times, &column(series, |s| s.speed))?;
    let accel = interpolate(grid, &times, &column(series, |s| s.accel))?;
    let heading = interpolate(grid, &times, &unwrap_degrees(&column(series, |s| s.heading)))?;

    let samples: Vec<TelemetrySample> = (0..grid.len())
        .map(|i| TelemetrySample {
            timestamp: grid[i],
            lat: lat[i],
            lon: lon[i],
            speed: speed[i],
            accel: accel[i],
            heading: config.heading_wrap.apply(heading[i]),
        })
        .collect();

    debug!(
        "Resampled {} source samples onto {} grid points ({} excluded in {} gap(s))",
        series.len(),
        walk.total(),
        walk.excluded,
        gap_spans.len()
    );

    Ok(ResampleOutput {
        samples,
        grid_points: walk.total(),
        gap_spans,
        excluded: walk.excluded,
    })
}

fn column(series: &[TelemetrySample], field: impl Fn(&TelemetrySample) -> f64) -> Vec<f64> {
    series.iter().map(field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WrapBehavior;

    fn sample(timestamp: f64, value: f64, heading: f64) -> TelemetrySample {
        TelemetrySample {
            timestamp,
            lat: value,
            lon: value,
            speed: value * 2.0,
            accel: value * 0.2,
            heading,
        }
    }

    #[test]
    fn test_heading_crosses_north_shortest_path() {
        let series = [sample(0.0, 0.0, 350.0), sample(1.0, 1.0, 10.0)];
        let out = resample_series(&series, &ResampleConfig::default()).unwrap();
        assert_eq!(out.samples.len(), 11);
        let mid = out.samples[5];
        assert!((mid.timestamp - 0.5).abs() < 1e-9);
        assert!(mid.heading.abs() < 1e-9 || (360.0 - mid.heading) < 1e-9);
        for s in &out.samples {
            assert!((0.0..360.0).contains(&s.heading));
        }
    }

    #[test]
    fn test_configured_wrap_applied_to_heading() {
        let config = ResampleConfig {
            heading_wrap: WrapBehavior::Mod360,
            ..Default::default()
        };
        let series = [sample(0.0, 0.0, -90.0), sample(1.0, 1.0, 720.0)];
        let out = resample_series(&series, &config).unwrap();
        assert_eq!(out.samples[0].heading, 270.0);
        assert_eq!(out.samples[10].heading, 0.0);
        assert!(out.samples.iter().all(|s| (0.0..360.0).contains(&s.heading)));
    }

    #[test]
    fn test_fields_interpolated_linearly() {
        let series = [sample(0.0, 0.0, 90.0), sample(1.0, 5.0, 90.0)];
        let out = resample_series(&series, &ResampleConfig::default()).unwrap();
        let mid = out.samples[5];
        assert!((mid.speed - 5.0).abs() < 1e-9);
        assert!((mid.lat - 2.5).abs() < 1e-9);
        assert!((mid.accel - 0.5).abs() < 1e-9);
        assert_eq!(mid.heading, 90.0);
    }

    #[test]
    fn test_gap_rows_dropped_atomically() {
        let series: Vec<TelemetrySample> = [0.0, 1.0, 2.0, 5.0, 6.0]
            .iter()
            .map(|&t| sample(t, t, 0.0))
            .collect();
        let out = resample_series(&series, &ResampleConfig::default()).unwrap();
        assert_eq!(out.grid_points, 61);
        assert_eq!(out.excluded, 29);
        assert_eq!(out.samples.len(), 32);
        assert_eq!(out.gap_spans.len(), 1);
        assert!(out
            .samples
            .iter()
            .all(|s| s.timestamp <= 2.0 + 1e-9 || s.timestamp >= 5.0 - 1e-9));
    }

    #[test]
    fn test_long_gap_cost_follows_output_rows() {
        let series: Vec<TelemetrySample> = [0.0, 1.0, 2.0e6, 2.0e6 + 1.0]
            .iter()
            .map(|&t| sample(t, 1.0, 0.0))
            .collect();
        let started = std::time::Instant::now();
        let out = resample_series(&series, &ResampleConfig::default()).unwrap();

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(out.samples.len(), 22);
        assert_eq!(out.grid_points, 20_000_011);
        assert_eq!(out.excluded, 20_000_011 - 22);
        assert_eq!(out.gap_spans.len(), 1);
    }

    #[test]
    fn test_degenerate_series_is_empty() {
        let config = ResampleConfig::default();
        assert!(resample_series(&[], &config).unwrap().samples.is_empty());
        assert!(resample_series(&[sample(3.0, 1.0, 0.0)], &config).unwrap().samples.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ResampleConfig { rate_hz: 0, ..Default::default() };
        let series = [sample(0.0, 0.0, 0.0), sample(1.0, 1.0, 0.0)];
        assert!(resample_series(&series, &config).is_err());
    }
}
