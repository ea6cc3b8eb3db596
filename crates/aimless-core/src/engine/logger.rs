//! Append-only, resumable recording of attempted shooting points.
//!
//! Every attempted shooting point that produced a well-formed result is
//! recorded twice: one CSV row with the accept flag, commit basins and box
//! dimensions, and one XYZ block with the starting configuration. A logger
//! may forward each record to a shared aggregate logger, which is how a
//! parallel run merges its per-instance logs.

use crate::core::io::xyz::{self, XyzError};
use crate::core::models::{BasinId, Frame, ShootingResult};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

const CSV_HEADER: [&str; 7] = [
    "index",
    "accepted",
    "forward_basin",
    "reverse_basin",
    "box_x",
    "box_y",
    "box_z",
];

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xyz(#[from] XyzError),

    #[error("Aggregate logger lock was poisoned")]
    AggregateLock,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResultRow {
    index: u64,
    accepted: bool,
    forward_basin: Option<BasinId>,
    reverse_basin: Option<BasinId>,
    box_x: f64,
    box_y: f64,
    box_z: f64,
}

/// Dual-sink recorder writing `<name>.csv` and `<name>.xyz`.
///
/// Both files are opened in append mode. If the CSV already holds data rows,
/// the row index continues from `max(existing) + 1`; it never resets for a
/// non-empty file, so re-running against existing outputs extends them.
pub struct ResultsLogger {
    csv: csv::Writer<File>,
    xyz: BufWriter<File>,
    next_index: u64,
    parent: Option<Arc<Mutex<ResultsLogger>>>,
}

impl ResultsLogger {
    /// Opens (or resumes) the `<name>.csv` / `<name>.xyz` file pair.
    pub fn new(name: &str) -> Result<Self, LoggerError> {
        Self::open(name, None)
    }

    /// Like [`new`](Self::new), but forwards every record to `parent`
    /// synchronously, in emission order.
    pub fn with_parent(
        name: &str,
        parent: Arc<Mutex<ResultsLogger>>,
    ) -> Result<Self, LoggerError> {
        Self::open(name, Some(parent))
    }

    fn open(
        name: &str,
        parent: Option<Arc<Mutex<ResultsLogger>>>,
    ) -> Result<Self, LoggerError> {
        let csv_path = PathBuf::from(format!("{name}.csv"));
        let xyz_path = PathBuf::from(format!("{name}.xyz"));

        let next_index = last_index(&csv_path)?.map_or(0, |last| last + 1);
        let is_fresh = std::fs::metadata(&csv_path).map_or(true, |meta| meta.len() == 0);

        let csv_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&csv_path)?;
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(csv_file);
        if is_fresh {
            csv.write_record(CSV_HEADER)?;
            csv.flush()?;
        }

        let xyz_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&xyz_path)?;

        debug!(
            csv = %csv_path.display(),
            next_index,
            "Results logger opened."
        );

        Ok(Self {
            csv,
            xyz: BufWriter::new(xyz_file),
            next_index,
            parent,
        })
    }

    /// Index the next recorded row will carry.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Appends one attempted shooting point to both sinks and forwards it to
    /// the aggregate logger, if any.
    ///
    /// `start` is the configuration the point was shot from; the XYZ block
    /// records it under a comment carrying the row index and both commit
    /// basins. Rows are flushed per call so an interrupted run resumes
    /// cleanly.
    pub fn log_result(
        &mut self,
        result: &ShootingResult,
        symbols: &[String],
        start: &Frame,
        accepted: bool,
        box_dimensions: [f64; 3],
    ) -> Result<(), LoggerError> {
        let index = self.next_index;
        self.csv.serialize(ResultRow {
            index,
            accepted,
            forward_basin: result.forward.commit,
            reverse_basin: result.reverse.commit,
            box_x: box_dimensions[0],
            box_y: box_dimensions[1],
            box_z: box_dimensions[2],
        })?;
        self.csv.flush()?;

        let comment = format!(
            "{}, {}, {}",
            index,
            fmt_basin(result.forward.commit),
            fmt_basin(result.reverse.commit)
        );
        xyz::write_frame(&mut self.xyz, symbols, start, &comment)?;
        self.xyz.flush()?;

        self.next_index += 1;

        if let Some(parent) = &self.parent {
            let mut aggregate = parent.lock().map_err(|_| LoggerError::AggregateLock)?;
            aggregate.log_result(result, symbols, start, accepted, box_dimensions)?;
        }
        Ok(())
    }
}

fn fmt_basin(commit: Option<BasinId>) -> String {
    commit.map_or_else(|| "None".to_string(), |basin| basin.to_string())
}

/// Largest row index already present in `path`, or `None` for a missing or
/// row-less file.
fn last_index(path: &PathBuf) -> Result<Option<u64>, LoggerError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut last = None;
    for row in reader.deserialize::<ResultRow>() {
        let row = row?;
        last = Some(last.map_or(row.index, |current: u64| current.max(row.index)));
    }
    Ok(last)
}
