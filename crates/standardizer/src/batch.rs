//! Batch Driver
//!
//! Runs the per-file pipeline over many inputs. A failing file never aborts
//! the batch. The parallel variant fans files out over tokio's blocking pool
//! and still reports outcomes in input order.

use crate::pipeline::{FileOutcome, Standardizer};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Outcomes of one batch run, in input order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Files with a standardized output
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Written { .. }))
    }

    /// Files skipped for missing columns
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    /// Files that could not be read or written
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }

    /// Whether skipped plus failed files exceed `max_skips`; no limit never does
    pub fn exceeds_skip_limit(&self, max_skips: Option<usize>) -> bool {
        max_skips.is_some_and(|limit| self.skipped() + self.failed() > limit)
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Drives a `Standardizer` over a list of input files
pub struct BatchRunner {
    standardizer: Arc<Standardizer>,
    output_dir: PathBuf,
}

impl BatchRunner {
    /// Create a runner, creating `output_dir` if needed
    pub fn new(standardizer: Standardizer, output_dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            standardizer: Arc::new(standardizer),
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process inputs one at a time, calling `on_outcome` as each finishes
    pub fn run(&self, inputs: &[PathBuf], mut on_outcome: impl FnMut(&FileOutcome)) -> BatchReport {
        let collisions = output_collisions(inputs);
        let mut report = BatchReport::default();
        for (input, collision) in inputs.iter().zip(collisions) {
            let outcome = match collision {
                Some(error) => FileOutcome::Failed {
                    input: input.clone(),
                    error,
                },
                None => self.standardizer.standardize_file(input, &self.output_dir),
            };
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }
        self.log_summary(&report);
        report
    }

    /// Process inputs with at most `jobs` files in flight.
    ///
    /// `on_outcome` is called in input order, so the status stream matches `run`.
    pub async fn run_parallel(
        &self,
        inputs: &[PathBuf],
        jobs: usize,
        mut on_outcome: impl FnMut(&FileOutcome),
    ) -> BatchReport {
        let permits = Arc::new(Semaphore::new(jobs.max(1)));
        let mut handles = Vec::with_capacity(inputs.len());

        for (input, collision) in inputs.iter().zip(output_collisions(inputs)) {
            if let Some(error) = collision {
                handles.push((input.clone(), Err(error)));
                continue;
            }
            let standardizer = Arc::clone(&self.standardizer);
            let output_dir = self.output_dir.clone();
            let input = input.clone();
            let permits = Arc::clone(&permits);
            let task_input = input.clone();
            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                tokio::task::spawn_blocking(move || {
                    standardizer.standardize_file(&task_input, &output_dir)
                })
                .await
            });
            handles.push((input, Ok(handle)));
        }

        let mut report = BatchReport::default();
        for (input, handle) in handles {
            let handle = match handle {
                Ok(handle) => handle,
                Err(error) => {
                    let outcome = FileOutcome::Failed { input, error };
                    on_outcome(&outcome);
                    report.outcomes.push(outcome);
                    continue;
                }
            };
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) | Err(e) => {
                    error!("Worker for {} aborted: {}", input.display(), e);
                    FileOutcome::Failed {
                        input,
                        error: format!("worker aborted: {e}"),
                    }
                }
            };
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        self.log_summary(&report);
        report
    }

    fn log_summary(&self, report: &BatchReport) {
        info!(
            "Batch complete: {} written, {} skipped, {} failed",
            report.written(),
            report.skipped(),
            report.failed()
        );
    }
}

/// Per input, an error if its output name was already claimed by an earlier input.
///
/// Outputs are named after the input file name, so `a/trace.csv` and
/// `b/trace.csv` would share one output and one staging file.
fn output_collisions(inputs: &[PathBuf]) -> Vec<Option<String>> {
    let mut claimed: HashMap<&std::ffi::OsStr, &Path> = HashMap::new();
    inputs
        .iter()
        .map(|input| {
            let name = input.file_name()?;
            match claimed.get(name) {
                Some(first) => {
                    warn!(
                        "{} collides with {} on output name {}",
                        input.display(),
                        first.display(),
                        name.to_string_lossy()
                    );
                    Some(format!(
                        "output name {} collides with {}",
                        name.to_string_lossy(),
                        first.display()
                    ))
                }
                None => {
                    claimed.insert(name, input);
                    None
                }
            }
        })
        .collect()
}
