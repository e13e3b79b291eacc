//! Telemetry Standardizer
//!
//! Brings raw vehicle-telemetry CSV files onto the frozen data contract:
//! required columns, uniform sampling rate, circular heading, no
//! interpolation across sampling gaps.

mod batch;
mod error;
mod loader;
mod pipeline;
mod writer;

pub use batch::{BatchReport, BatchRunner};
pub use error::StandardizeError;
pub use loader::{RawRow, RawTable, TableLoader};
pub use pipeline::{sort_and_dedupe, FileOutcome, FileStats, Standardized, Standardizer};
pub use writer::{write_series, write_series_file};

use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}
