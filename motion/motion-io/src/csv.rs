//! Headerless CSV clips.
//!
//! One frame per line, fields separated by commas, no header row. Values
//! are written with exactly six digits after the decimal point:
//!
//! ```text
//! 0.000000,0.000000,0.800000,0.000000,0.000000,0.000000,1.000000,0.000000,...
//! ```
//!
//! Blank lines are skipped on read. Every other line must hold the same
//! number of fields as the first one.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use motion_types::MotionClip;
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Digits written after the decimal point.
pub const CSV_PRECISION: usize = 6;

/// Load a clip from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a value is not a finite
/// number ([`IoError::Parse`] with line and column), or the rows do not
/// form a valid clip.
pub fn load_csv<P: AsRef<Path>>(path: P, fps: f64) -> IoResult<MotionClip> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::open(e, path))?;
    let clip = read_csv(BufReader::new(file), fps)?;
    debug!(path = %path.display(), frames = clip.len(), "Loaded CSV clip");
    Ok(clip)
}

/// Read a clip from CSV text.
///
/// # Errors
///
/// Same as [`load_csv`].
pub fn read_csv<R: BufRead>(reader: R, fps: f64) -> IoResult<MotionClip> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut width: Option<usize> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let row = trimmed
            .split(',')
            .enumerate()
            .map(|(column, field)| parse_field(field.trim(), line_number, column + 1))
            .collect::<IoResult<Vec<f64>>>()?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(IoError::parse(
                    line_number,
                    expected.min(row.len()) + 1,
                    format!("expected {expected} fields, got {}", row.len()),
                ));
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    Ok(MotionClip::from_rows(rows, fps)?)
}

fn parse_field(field: &str, line: usize, column: usize) -> IoResult<f64> {
    let value: f64 = field
        .parse()
        .map_err(|_| IoError::parse(line, column, format!("invalid number '{field}'")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IoError::parse(line, column, format!("non-finite value '{field}'")))
    }
}

/// Save a clip to a CSV file.
///
/// # Errors
///
/// Returns [`IoError::Motion`] if the clip holds a non-finite value (with
/// frame and field index), or an I/O error if the file cannot be written.
pub fn save_csv<P: AsRef<Path>>(clip: &MotionClip, path: P) -> IoResult<()> {
    let path = path.as_ref();
    clip.check_finite()?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv(clip, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), frames = clip.len(), "Saved CSV clip");
    Ok(())
}

/// Write a clip as CSV text.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_csv<W: Write>(clip: &MotionClip, mut writer: W) -> IoResult<()> {
    let mut line = String::new();
    for frame in clip {
        line.clear();
        for (i, value) in frame.values().iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&format!("{:.*}", CSV_PRECISION, value));
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
