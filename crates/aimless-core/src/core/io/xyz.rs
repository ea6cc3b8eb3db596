use crate::core::models::Frame;
use nalgebra::Vector3;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid particle count '{value}' on line {line}")]
    InvalidCount { line: usize, value: String },

    #[error("Unexpected end of file: expected {expected} particle lines, found {found}")]
    TruncatedFrame { expected: usize, found: usize },

    #[error("Malformed particle line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("File '{path}' contains no frames", path = path.display())]
    EmptyFile { path: PathBuf },

    #[error("No .xyz files found in directory '{path}'", path = path.display())]
    EmptyDirectory { path: PathBuf },
}

/// Streaming reader over the blocks of an XYZ file.
///
/// Tracks the current line number across blocks so diagnostics for a
/// malformed block deep inside a trajectory point at the real line.
pub struct XyzReader<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> XyzReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let read = self.reader.read_line(buf)?;
        if read > 0 {
            self.line += 1;
        }
        Ok(read)
    }

    /// Reads the next frame from the stream.
    ///
    /// Expects the reader to be positioned at a particle-count line, blank
    /// separator lines permitted. Returns `Ok(None)` when the stream is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is truncated or a line cannot be parsed
    /// as `<symbol> <x> <y> <z>`.
    pub fn next_frame(&mut self) -> Result<Option<(Vec<String>, Frame)>, XyzError> {
        let mut line = String::new();
        // Skip any blank separator lines before the count line.
        loop {
            if self.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            if !line.trim().is_empty() {
                break;
            }
        }

        let n_particles: usize = line.trim().parse().map_err(|_| XyzError::InvalidCount {
            line: self.line,
            value: line.trim().to_string(),
        })?;

        // Comment line is carried by the writer but ignored on read.
        self.read_line(&mut line)?;

        let mut symbols = Vec::with_capacity(n_particles);
        let mut rows = Vec::with_capacity(n_particles);
        for i in 0..n_particles {
            if self.read_line(&mut line)? == 0 {
                return Err(XyzError::TruncatedFrame {
                    expected: n_particles,
                    found: i,
                });
            }
            let mut fields = line.split_whitespace();
            let parsed = (|| {
                let symbol = fields.next()?;
                let x: f64 = fields.next()?.parse().ok()?;
                let y: f64 = fields.next()?.parse().ok()?;
                let z: f64 = fields.next()?.parse().ok()?;
                Some((symbol.to_string(), Vector3::new(x, y, z)))
            })();
            match parsed {
                Some((symbol, row)) => {
                    symbols.push(symbol);
                    rows.push(row);
                }
                None => {
                    return Err(XyzError::MalformedLine {
                        line: self.line,
                        content: line.trim().to_string(),
                    });
                }
            }
        }

        Ok(Some((symbols, Frame::new(rows))))
    }
}

/// Reads the first frame of the XYZ file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is empty, or its first
/// frame is malformed.
pub fn read_first_frame(path: impl AsRef<Path>) -> Result<(Vec<String>, Frame), XyzError> {
    let path = path.as_ref();
    let mut reader = XyzReader::new(BufReader::new(File::open(path)?));
    reader.next_frame()?.ok_or_else(|| XyzError::EmptyFile {
        path: path.to_path_buf(),
    })
}

/// Loads the first frame of every `.xyz` file in `dir`, sorted by file name.
///
/// The sort gives kickstart a fixed, deterministic processing order that does
/// not depend on directory enumeration order. Each frame is returned with the
/// path it came from so callers can name the file in diagnostics.
///
/// # Errors
///
/// Returns an error if the directory cannot be read, contains no `.xyz`
/// files, or any of them fails to parse.
pub fn load_guess_dir(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, Frame)>, XyzError> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xyz"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(XyzError::EmptyDirectory {
            path: dir.to_path_buf(),
        });
    }

    paths
        .into_iter()
        .map(|path| {
            let (_, frame) = read_first_frame(&path)?;
            Ok((path, frame))
        })
        .collect()
}

/// Appends one XYZ block to `writer`: the particle count, a comment line, and
/// one `<symbol> <x> <y> <z>` line per particle.
pub fn write_frame(
    writer: &mut impl Write,
    symbols: &[String],
    frame: &Frame,
    comment: &str,
) -> Result<(), XyzError> {
    writeln!(writer, "{}", frame.n_particles())?;
    writeln!(writer, "{}", comment)?;
    for (symbol, row) in symbols.iter().zip(frame.iter()) {
        writeln!(writer, "{} {:.10} {:.10} {:.10}", symbol, row.x, row.y, row.z)?;
    }
    Ok(())
}
