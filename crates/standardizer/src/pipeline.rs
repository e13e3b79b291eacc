//! Standardization Pipeline
//!
//! Per-file sequence: load and check columns, drop incomplete or
//! contract-invalid rows, sort and deduplicate, resample onto the uniform
//! grid with gap exclusion, emit.

use crate::error::StandardizeError;
use crate::loader::{RawRow, TableLoader};
use crate::writer::write_series_file;
use data_contract::StandardizationConfig;
use data_validator::Validator;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use telemetry_resample::{resample_series, TelemetrySample};
use tracing::{debug, info, warn};

/// Row and grid accounting for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Data rows in the input
    pub rows_read: usize,
    /// Rows dropped for missing, non-numeric or contract-invalid values
    pub rows_dropped: usize,
    /// Non-empty cells coerced to missing
    pub values_coerced: usize,
    /// Rows collapsed onto an earlier row with the same timestamp
    pub duplicates_removed: usize,
    /// Uniform grid size before gap exclusion
    pub grid_points: usize,
    /// Source gaps wider than the tolerance
    pub gap_spans: usize,
    /// Grid points excluded inside gaps
    pub gap_points_excluded: usize,
    /// Rows in the standardized output
    pub rows_written: usize,
}

/// Standardized series for one file
#[derive(Debug, Clone, Default)]
pub struct Standardized {
    pub samples: Vec<TelemetrySample>,
    pub stats: FileStats,
}

/// Result of processing one input file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Standardized file written (possibly with zero rows)
    Written {
        input: PathBuf,
        output: PathBuf,
        stats: FileStats,
    },
    /// Input lacks required columns; nothing written
    Skipped { input: PathBuf, missing: Vec<String> },
    /// Input unreadable or output unwritable
    Failed { input: PathBuf, error: String },
}

impl FileOutcome {
    /// Input path this outcome refers to
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Written { input, .. }
            | FileOutcome::Skipped { input, .. }
            | FileOutcome::Failed { input, .. } => input,
        }
    }

    /// One-line user-facing status
    pub fn status_line(&self) -> String {
        match self {
            FileOutcome::Written { output, .. } => {
                format!("[OK] Wrote standardized: {}", output.display())
            }
            FileOutcome::Skipped { input, missing } => {
                format!("[WARN] Skip {} due to missing cols: {:?}", input.display(), missing)
            }
            FileOutcome::Failed { input, error } => {
                format!("[ERROR] Failed {}: {}", input.display(), error)
            }
        }
    }
}

/// Contract-driven standardizer for single files
#[derive(Debug, Clone)]
pub struct Standardizer {
    config: StandardizationConfig,
    validator: Validator,
}

impl Standardizer {
    /// Create a standardizer; rejects unusable settings
    pub fn new(config: StandardizationConfig) -> Result<Self, StandardizeError> {
        config
            .validate()
            .map_err(|e| StandardizeError::Config(e.to_string()))?;
        Ok(Self {
            validator: Validator::new(config.validation),
            config,
        })
    }

    /// Active settings
    pub fn config(&self) -> &StandardizationConfig {
        &self.config
    }

    /// Run every stage up to gap filtering on CSV content
    pub fn standardize_reader<R: Read>(&self, reader: R) -> Result<Standardized, StandardizeError> {
        let table = TableLoader::new(&self.config.required_columns).load(reader)?;
        let mut stats = FileStats {
            rows_read: table.rows.len(),
            values_coerced: table.coerced_values,
            ..Default::default()
        };
        if table.coerced_values > 0 {
            debug!("{} non-numeric values coerced to missing", table.coerced_values);
        }

        let complete: Vec<TelemetrySample> = table.rows.iter().filter_map(complete_sample).collect();
        let validated = self.validator.validate_all(complete);
        stats.rows_dropped = stats.rows_read - validated.valid.len();

        let mut series = validated.valid;
        stats.duplicates_removed = sort_and_dedupe(&mut series);

        if series.len() < 2 {
            debug!("Only {} valid rows, emitting empty series", series.len());
            return Ok(Standardized {
                samples: Vec::new(),
                stats,
            });
        }

        let output = resample_series(&series, &self.config.resample)?;
        stats.grid_points = output.grid_points;
        stats.gap_spans = output.gap_spans.len();
        stats.gap_points_excluded = output.excluded;
        stats.rows_written = output.samples.len();

        Ok(Standardized {
            samples: output.samples,
            stats,
        })
    }

    /// Standardize one file into `output_dir`, containing every error at the file boundary
    pub fn standardize_file(&self, input: &Path, output_dir: &Path) -> FileOutcome {
        match self.process_file(input, output_dir) {
            Ok((output, stats)) => {
                info!(
                    "Standardized {} -> {} ({} rows, {} dropped, {} in gaps)",
                    input.display(),
                    output.display(),
                    stats.rows_written,
                    stats.rows_dropped,
                    stats.gap_points_excluded
                );
                record_metrics(&stats);
                metrics::counter!("standardizer_files_total", "outcome" => "written").increment(1);
                FileOutcome::Written {
                    input: input.to_path_buf(),
                    output,
                    stats,
                }
            }
            Err(StandardizeError::MissingColumns(missing)) => {
                warn!("Skipping {}: missing columns {:?}", input.display(), missing);
                metrics::counter!("standardizer_files_total", "outcome" => "skipped").increment(1);
                FileOutcome::Skipped {
                    input: input.to_path_buf(),
                    missing,
                }
            }
            Err(e) => {
                warn!("Failed to standardize {}: {}", input.display(), e);
                metrics::counter!("standardizer_files_total", "outcome" => "failed").increment(1);
                FileOutcome::Failed {
                    input: input.to_path_buf(),
                    error: e.to_string(),
                }
            }
        }
    }

    fn process_file(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<(PathBuf, FileStats), StandardizeError> {
        let file_name = input.file_name().ok_or_else(|| {
            StandardizeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("input path has no file name: {}", input.display()),
            ))
        })?;

        let reader = BufReader::new(File::open(input)?);
        let standardized = self.standardize_reader(reader)?;

        let output = output_dir.join(file_name);
        write_series_file(&output, &standardized.samples)?;
        Ok((output, standardized.stats))
    }
}

/// Sort by timestamp (stable) and keep the first row of each timestamp.
///
/// Returns the number of rows removed.
pub fn sort_and_dedupe(series: &mut Vec<TelemetrySample>) -> usize {
    let before = series.len();
    series.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    series.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
    before - series.len()
}

fn complete_sample(row: &RawRow) -> Option<TelemetrySample> {
    let [timestamp, lat, lon, speed, accel, heading] = *row;
    Some(TelemetrySample {
        timestamp: timestamp?,
        lat: lat?,
        lon: lon?,
        speed: speed?,
        accel: accel?,
        heading: heading?,
    })
}

fn record_metrics(stats: &FileStats) {
    metrics::counter!("standardizer_rows_dropped_total").increment(stats.rows_dropped as u64);
    metrics::counter!("standardizer_duplicates_removed_total")
        .increment(stats.duplicates_removed as u64);
    metrics::counter!("standardizer_gap_points_excluded_total")
        .increment(stats.gap_points_excluded as u64);
    metrics::counter!("standardizer_rows_written_total").increment(stats.rows_written as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standardizer() -> Standardizer {
        Standardizer::new(StandardizationConfig::default()).unwrap()
    }

    fn at(timestamp: f64, speed: f64) -> TelemetrySample {
        TelemetrySample {
            timestamp,
            speed,
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_and_dedupe_keeps_first() {
        let mut series = vec![at(2.0, 1.0), at(1.0, 2.0), at(2.0, 3.0), at(1.0, 4.0), at(0.0, 5.0)];
        let removed = sort_and_dedupe(&mut series);
        assert_eq!(removed, 2);
        assert_eq!(series, vec![at(0.0, 5.0), at(1.0, 2.0), at(2.0, 1.0)]);
    }

    #[test]
    fn test_incomplete_and_invalid_rows_dropped() {
        let csv = "timestamp,lat,lon,speed,accel,heading\n\
                   0.0,0,0,0,0,0\n\
                   0.5,,0,1,0,0\n\
                   1.0,95,0,1,0,0\n\
                   1.5,0,0,-2,0,0\n\
                   2.0,0,0,4,0,0\n";
        let out = standardizer().standardize_reader(csv.as_bytes()).unwrap();
        assert_eq!(out.stats.rows_read, 5);
        assert_eq!(out.stats.rows_dropped, 3);
        assert_eq!(out.stats.grid_points, 21);
        assert_eq!(out.stats.rows_written, 21);
        assert!((out.samples[10].speed - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_is_empty_output() {
        let csv = "timestamp,lat,lon,speed,accel,heading\n0.0,0,0,0,0,0\n";
        let out = standardizer().standardize_reader(csv.as_bytes()).unwrap();
        assert!(out.samples.is_empty());
        assert_eq!(out.stats.rows_written, 0);
    }

    #[test]
    fn test_duplicate_only_timestamps_are_empty_output() {
        let csv = "timestamp,lat,lon,speed,accel,heading\n3.0,0,0,0,0,0\n3.0,1,1,1,1,1\n";
        let out = standardizer().standardize_reader(csv.as_bytes()).unwrap();
        assert!(out.samples.is_empty());
        assert_eq!(out.stats.duplicates_removed, 1);
    }

    #[test]
    fn test_missing_columns_error() {
        let csv = "timestamp,lat,lon,speed,heading\n0,0,0,0,0\n";
        assert!(matches!(
            standardizer().standardize_reader(csv.as_bytes()),
            Err(StandardizeError::MissingColumns(_))
        ));
    }

    #[test]
    fn test_status_lines() {
        let skipped = FileOutcome::Skipped {
            input: PathBuf::from("raw/a.csv"),
            missing: vec!["accel".to_string()],
        };
        assert_eq!(skipped.status_line(), "[WARN] Skip raw/a.csv due to missing cols: [\"accel\"]");

        let written = FileOutcome::Written {
            input: PathBuf::from("raw/b.csv"),
            output: PathBuf::from("std/b.csv"),
            stats: FileStats::default(),
        };
        assert_eq!(written.status_line(), "[OK] Wrote standardized: std/b.csv");
        assert_eq!(written.input(), Path::new("raw/b.csv"));
    }
}
