//! Standardized CSV emission

use crate::error::StandardizeError;
use csv::WriterBuilder;
use data_contract::REQUIRED_COLUMNS;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use telemetry_resample::TelemetrySample;

/// Write samples with the fixed contract header; an empty series still gets the header
pub fn write_series<W: Write>(writer: W, samples: &[TelemetrySample]) -> Result<(), StandardizeError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(REQUIRED_COLUMNS)?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write to `path` through a sibling temp file so readers never see a partial file
pub fn write_series_file(path: &Path, samples: &[TelemetrySample]) -> Result<(), StandardizeError> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".partial");
    let staging = Path::new(&staging).to_path_buf();

    let result = File::create(&staging)
        .map_err(StandardizeError::from)
        .and_then(|file| write_series(BufWriter::new(file), samples));
    if let Err(e) = result {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    fs::rename(&staging, path)?;
    Ok(())
}
