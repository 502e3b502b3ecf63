//! I/O utilities for rainfall input and time series output.
//!
//! # File Formats
//!
//! ## Rainfall Schedule Files
//!
//! ```text
//! # columns: time(s) rate(m/s)
//! 0.0    2.0e-5
//! 600.0  0.0
//! ```
//!
//! ## Hydrograph CSV
//!
//! ```text
//! time,discharge
//! 0,0e0
//! 60,1.25e-2
//! ```

mod rainfall_reader;
mod timeseries_writer;

pub use rainfall_reader::{RainfallFileError, parse_rainfall_schedule, read_rainfall_schedule};
pub use timeseries_writer::{write_hydrograph_csv, write_timeseries_csv};
