// McPlaytime - core/export.rs
//
// CSV and JSON export of per-date play time.
// Core layer: writes to any Write trait object.

use crate::core::model::PlaytimeByDate;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One exported row: a date and the whole seconds played on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub seconds: i64,
}

fn records(playtime: &PlaytimeByDate) -> impl Iterator<Item = DayRecord> + '_ {
    playtime.iter().map(|(date, duration)| DayRecord {
        date: date.format("%Y-%m-%d").to_string(),
        seconds: duration.num_seconds(),
    })
}

/// Export per-date play time as CSV.
///
/// Writes a `date,seconds` header and one row per date in ascending order.
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(
    playtime: &PlaytimeByDate,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["date", "seconds"]).map_err(csv_err)?;

    let mut count = 0;
    for record in records(playtime) {
        csv_writer
            .write_record([record.date.as_str(), record.seconds.to_string().as_str()])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export per-date play time as a JSON array of `{date, seconds}` objects.
pub fn export_json<W: Write>(
    playtime: &PlaytimeByDate,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let rows: Vec<DayRecord> = records(playtime).collect();
    serde_json::to_writer_pretty(writer, &rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(rows.len())
}
