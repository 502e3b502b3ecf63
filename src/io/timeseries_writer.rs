//! CSV output of recorded time series.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::simulation::{Hydrograph, TimeSeries};

/// Write a time series as two-column CSV with the given value header.
pub fn write_timeseries_csv(
    path: &Path,
    value_header: &str,
    series: &TimeSeries,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "time,{}", value_header)?;
    for point in &series.data {
        writeln!(writer, "{},{:e}", point.time, point.value)?;
    }
    writer.flush()
}

/// Write a hydrograph as `time,discharge` CSV.
pub fn write_hydrograph_csv(path: &Path, hydrograph: &Hydrograph) -> std::io::Result<()> {
    write_timeseries_csv(path, "discharge", &hydrograph.series)
}
