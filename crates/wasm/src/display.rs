//! Display-time enrichment for table cells.
//!
//! Workbooks often keep dates as bare serial numbers. The pipeline leaves
//! them as numbers; this module is where a viewer turns them back into
//! calendar dates for display, based on the column name.

use chrono::{Days, NaiveDate};
use sheetlens_sheet::CellValue;

/// Header fragments (lower-case) that mark a column as holding dates
pub const DATE_COLUMN_MARKERS: [&str; 5] = ["date", "naissance", "recrutement", "avancement", "retraite"];

// Serial numbers outside (0, 100000) are not treated as dates.
const MAX_DATE_SERIAL: f64 = 100_000.0;

/// True if the header name suggests the column holds dates
pub fn is_date_column(header: &str) -> bool {
    let header = header.to_lowercase();
    DATE_COLUMN_MARKERS.iter().any(|marker| header.contains(marker))
}

/// Convert an Excel serial day number to a calendar date.
///
/// The fractional (time of day) part is dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(serial > 0.0 && serial < MAX_DATE_SERIAL) {
        return None;
    }
    // Serial day 0 is 1899-12-30, which also absorbs the 1900 leap-year bug
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

/// Text to show for a cell: serial dates in date columns as `DD/MM/YYYY`,
/// everything else as its plain text
pub fn format_display_cell(header: &str, value: &CellValue) -> String {
    let serial = match value {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        _ => None,
    };

    serial
        .filter(|_| is_date_column(header))
        .and_then(serial_to_date)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}
