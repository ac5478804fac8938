use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;

use crate::types::{ImuRecording, ImuSample};

/// Columns every row must carry: timestamp, accel XYZ, gyro XYZ.
const REQUIRED_COLUMNS: usize = 7;

/// Load a whole recording from a CSV (or gzipped CSV) log.
///
/// The first row is treated as a header and skipped. Columns beyond the
/// required seven are ignored, so logs with extra channels load as-is.
pub fn load_recording(path: impl AsRef<Path>) -> Result<ImuRecording> {
    let samples = load_samples(path)?;
    Ok(ImuRecording::from_samples(&samples))
}

/// Load per-row samples from a CSV (or gzipped CSV) log.
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<ImuSample>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(open_log(path)?);

    let mut samples = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        // header is line 1, first record is line 2
        let line = row_idx + 2;
        let record =
            result.with_context(|| format!("line {} is malformed in {:?}", line, path))?;
        if record.len() < REQUIRED_COLUMNS {
            bail!(
                "line {} in {:?} has {} columns, need at least {}",
                line,
                path,
                record.len(),
                REQUIRED_COLUMNS
            );
        }

        let mut fields = [0.0f64; REQUIRED_COLUMNS];
        for (col, slot) in fields.iter_mut().enumerate() {
            *slot = record[col].parse().with_context(|| {
                format!("column {} on line {} of {:?} is not numeric", col + 1, line, path)
            })?;
        }

        samples.push(ImuSample {
            timestamp: fields[0],
            accel_x: fields[1],
            accel_y: fields[2],
            accel_z: fields[3],
            gyro_x: fields[4],
            gyro_y: fields[5],
            gyro_z: fields[6],
        });
    }

    if samples.is_empty() {
        return Err(anyhow!("{:?} contains no samples", path));
    }
    Ok(samples)
}

/// Open a log file, transparently decompressing `.gz`.
fn open_log(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("could not open {:?}", path))?;
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
