//! Reader for rainfall schedule files.
//!
//! # File Format
//!
//! ```text
//! # Design storm, 10 minutes at 72 mm/h
//! # columns: time(s) rate(m/s)
//! 0.0    2.0e-5
//! 600.0  0.0
//! ```
//!
//! Each data line starts a new constant rate. Time values must be strictly
//! increasing.

use std::path::Path;

use thiserror::Error;

use crate::simulation::{RainfallSchedule, ScheduleError};

/// Error type for rainfall file parsing.
#[derive(Debug, Error)]
pub enum RainfallFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error with line number
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Empty file (no data records)
    #[error("rainfall file contains no data")]
    Empty,

    /// Non-monotonic time values
    #[error("non-monotonic time at line {line}")]
    NonMonotonic { line: usize },

    /// Values parsed but do not form a valid schedule
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

fn parse_value(field: &str, line: usize, what: &str) -> Result<f64, RainfallFileError> {
    field.parse().map_err(|_| RainfallFileError::Parse {
        line,
        message: format!("invalid {} '{}'", what, field),
    })
}

/// Parse a rainfall schedule from a string.
pub fn parse_rainfall_schedule(content: &str) -> Result<RainfallSchedule, RainfallFileError> {
    let mut breakpoints = Vec::new();
    let mut last_time: Option<f64> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line_no = line_num + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(RainfallFileError::Parse {
                line: line_no,
                message: "expected: time rate".into(),
            });
        }

        let time = parse_value(parts[0], line_no, "time")?;
        let rate = parse_value(parts[1], line_no, "rate")?;

        if let Some(prev) = last_time
            && time <= prev
        {
            return Err(RainfallFileError::NonMonotonic { line: line_no });
        }
        last_time = Some(time);

        breakpoints.push((time, rate));
    }

    if breakpoints.is_empty() {
        return Err(RainfallFileError::Empty);
    }

    Ok(RainfallSchedule::new(breakpoints)?)
}

/// Read a rainfall schedule file.
pub fn read_rainfall_schedule(path: &Path) -> Result<RainfallSchedule, RainfallFileError> {
    let content = std::fs::read_to_string(path)?;
    parse_rainfall_schedule(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_schedule() {
        let content = "# storm\n# columns: time rate\n0.0 2e-5\n\n600.0 0.0 # dry\n";
        let schedule = parse_rainfall_schedule(content).unwrap();

        assert_eq!(schedule.breakpoints().len(), 2);
        assert_eq!(schedule.rate_at(300.0), 2e-5);
        assert_eq!(schedule.rate_at(600.0), 0.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_rainfall_schedule("# only comments\n"),
            Err(RainfallFileError::Empty)
        ));
        assert!(matches!(
            parse_rainfall_schedule("0.0 1e-5\n10.0\n"),
            Err(RainfallFileError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_rainfall_schedule("0.0 abc\n"),
            Err(RainfallFileError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_rainfall_schedule("0.0 1e-5\n# gap\n0.0 2e-5\n"),
            Err(RainfallFileError::NonMonotonic { line: 3 })
        ));
        assert!(matches!(
            parse_rainfall_schedule("-5.0 1e-5\n"),
            Err(RainfallFileError::Schedule(ScheduleError::InvalidTime { .. }))
        ));
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# columns: time(s) rate(m/s)").unwrap();
        writeln!(file, "0.0 1.0e-5").unwrap();
        writeln!(file, "120.0 3.0e-5").unwrap();
        file.flush().unwrap();

        let schedule = read_rainfall_schedule(file.path()).unwrap();
        assert_eq!(schedule.next_change_after(0.0), Some(120.0));
        assert_eq!(schedule.rate_at(500.0), 3.0e-5);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_rainfall_schedule(Path::new("/nonexistent/rain.txt")),
            Err(RainfallFileError::Io(_))
        ));
    }
}
